use serde::{Deserialize, Serialize};

use crate::product::ResolvedProduct;
use crate::tag::tagger::Tagger;

/// The tag every repository in the run receives. All fields are shared
/// across products except the commit sha, which is filled in per product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagTemplate {
    pub name: String,
    pub message: String,
    pub tagger: Tagger,
}

impl TagTemplate {
    /// Build the per-product target tag.
    ///
    /// External repos must not have tags starting with a number; a
    /// requested tag that violates this gets a 'v' prefix.
    pub fn for_product(&self, sha: impl Into<String>, is_external: bool) -> TargetTag {
        let name = if is_external && self.name.starts_with(|c: char| c.is_ascii_digit()) {
            format!("v{}", self.name)
        } else {
            self.name.clone()
        };

        TargetTag {
            name,
            message: self.message.clone(),
            tagger: self.tagger.clone(),
            sha: sha.into(),
        }
    }
}

/// The annotated tag to be created on one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetTag {
    pub name: String,
    pub message: String,
    pub tagger: Tagger,
    pub sha: String,
}

/// A resolved product with its target tag and the decision whether an
/// existing reference must be forcibly repointed instead of newly created.
#[derive(Debug, Clone)]
pub struct TagPlan {
    pub resolved: ResolvedProduct,
    pub target_tag: TargetTag,
    pub update_tag: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn template(name: &str) -> TagTemplate {
        TagTemplate {
            name: name.to_string(),
            message: "Version 11.0.rc2 release from v11_0_rc2/b1679".to_string(),
            tagger: Tagger::new("Jane Doe", "jane@example.org", Utc::now()),
        }
    }

    #[test]
    fn test_internal_repo_keeps_name() {
        let tag = template("11.0.rc2").for_product("abc123", false);
        assert_eq!(tag.name, "11.0.rc2");
        assert_eq!(tag.sha, "abc123");
    }

    #[test]
    fn test_external_repo_gets_v_prefix_for_leading_digit() {
        let tag = template("11.0.rc2").for_product("abc123", true);
        assert_eq!(tag.name, "v11.0.rc2");
    }

    #[test]
    fn test_external_repo_keeps_non_digit_name() {
        let tag = template("w.2018.18").for_product("abc123", true);
        assert_eq!(tag.name, "w.2018.18");
    }

    #[test]
    fn test_template_fields_shared_across_products() {
        let tpl = template("w.2018.18");
        let a = tpl.for_product("abc123", false);
        let b = tpl.for_product("def456", false);
        assert_eq!(a.message, b.message);
        assert_eq!(a.tagger, b.tagger);
        assert_ne!(a.sha, b.sha);
    }
}
