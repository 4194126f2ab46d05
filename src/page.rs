use std::path::Path;

use anyhow::Context as _;

use crate::config::StageConfig;
use crate::dom::{Dom, MemoryDom};
use crate::foundation::error::{CinescrollError, CinescrollResult};

/// One navigation entry.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavItem {
    /// Fragment target, without the `#`.
    pub id: String,
    /// Link text.
    pub label: String,
}

/// One content panel.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionSpec {
    /// Panel `id`; scene ids are derived when missing.
    #[serde(default)]
    pub id: Option<String>,
    /// Heading text.
    pub title: String,
    /// Heading level, 1 or 2.
    #[serde(default = "default_level")]
    pub level: u8,
    /// Body copy.
    #[serde(default)]
    pub copy: String,
}

fn default_level() -> u8 {
    2
}

/// Page content rendered into the markup the stage expects.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageSpec {
    /// Nav entries in order.
    #[serde(default)]
    pub nav: Vec<NavItem>,
    /// Panels in order.
    pub sections: Vec<SectionSpec>,
}

impl PageSpec {
    /// Check levels and nav ids.
    pub fn validate(&self) -> CinescrollResult<()> {
        if self.sections.is_empty() {
            return Err(CinescrollError::markup("page needs at least one section"));
        }
        for (i, section) in self.sections.iter().enumerate() {
            if !matches!(section.level, 1 | 2) {
                return Err(CinescrollError::markup(format!(
                    "sections[{i}].level must be 1 or 2 (got {})",
                    section.level
                )));
            }
        }
        for (i, item) in self.nav.iter().enumerate() {
            if item.id.trim().is_empty() {
                return Err(CinescrollError::markup(format!("nav[{i}].id must be non-empty")));
            }
        }
        Ok(())
    }

    /// Parse and validate a page description.
    pub fn from_json_str(s: &str) -> CinescrollResult<Self> {
        let page: Self = serde_json::from_str(s)?;
        page.validate()?;
        Ok(page)
    }

    /// Read a JSON page description.
    pub fn load(path: &Path) -> CinescrollResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read page '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Render `header > nav > ul > li > a` and `main > section > div > h + p`
    /// using the selectors from `config`.
    pub fn build_dom(&self, config: &StageConfig) -> MemoryDom {
        let mut dom = MemoryDom::new();
        let doc = dom.document();

        let header = dom.element(doc, "header", &[]);
        let nav = dom.element(header, "nav", &[]);
        let list = dom.element(nav, "ul", &[("class", config.nav_list_class.as_str())]);
        for item in &self.nav {
            let li = dom.element(list, "li", &[]);
            let href = format!("#{}", item.id);
            let a = dom.element(li, "a", &[("href", href.as_str())]);
            dom.set_text(a, &item.label);
        }

        let root = dom.element(doc, "main", &[("id", config.root_id.as_str())]);
        for section in &self.sections {
            let mut attrs = vec![("class", config.section_class.as_str())];
            if let Some(id) = section.id.as_deref().filter(|id| !id.is_empty()) {
                attrs.push(("id", id));
            }
            let panel = dom.element(root, "section", &attrs);
            let content = dom.element(panel, "div", &[("class", config.content_class.as_str())]);
            let heading = dom.element(content, if section.level == 1 { "h1" } else { "h2" }, &[]);
            dom.set_text(heading, &section.title);
            let copy = dom.element(content, "p", &[]);
            dom.set_text(copy, &section.copy);
        }
        dom
    }
}
