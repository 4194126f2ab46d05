pub mod ease;
pub mod props;
pub mod scrub;
pub mod timeline;
