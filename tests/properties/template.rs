//! Filename template render/recover properties.

use std::path::{Path, PathBuf};

use proptest::prelude::*;
use stylesync::domain::services::relative_key;
use stylesync::{ContentHash, FilenameTemplate};

/// Basenames without dots that do not end in `_`
fn basename() -> impl Strategy<Value = String> {
    "[a-zA-Z]([a-zA-Z0-9_-]{0,14}[a-zA-Z0-9])?"
}

proptest! {
    #[test]
    fn name_only_template_recovers_basename(name in basename(), content in ".*") {
        let template = FilenameTemplate::new("[name].css");
        let source = PathBuf::from(format!("{}.scss", name));
        let rendered = template.render(&source, &content);
        prop_assert_eq!(&rendered, &format!("{}.css", name));
        prop_assert_eq!(template.recover(&rendered), name);
    }

    #[test]
    fn hashed_template_recovers_basename(name in basename(), content in ".*") {
        let template = FilenameTemplate::new("[name].[hash].css");
        let source = PathBuf::from(format!("{}.scss", name));
        let rendered = template.render(&source, &content);
        prop_assert_eq!(template.recover(&rendered), name);
    }

    #[test]
    fn hash_segment_is_eight_lowercase_hex(name in basename(), content in ".*") {
        let template = FilenameTemplate::new("[name].[hash].css");
        let rendered = template.render(&PathBuf::from(format!("{}.scss", name)), &content);
        let segments: Vec<&str> = rendered.split('.').collect();
        prop_assert_eq!(segments.len(), 3);
        let hash = segments[1];
        prop_assert_eq!(hash.len(), 8);
        prop_assert!(hash.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        let digest = ContentHash::from_content(&content);
        prop_assert_eq!(hash, digest.short());
    }

    #[test]
    fn same_content_same_name(name in basename(), content in ".*") {
        let template = FilenameTemplate::new("[name].[hash].css");
        let source = PathBuf::from(format!("{}.scss", name));
        prop_assert_eq!(template.render(&source, &content), template.render(&source, &content));
    }

    #[test]
    fn default_template_behaves_like_name_css(name in basename(), content in ".*") {
        let source = PathBuf::from(format!("{}.sass", name));
        let default = FilenameTemplate::from_option(None);
        let explicit = FilenameTemplate::new("[name].css");
        prop_assert_eq!(default.render(&source, &content), explicit.render(&source, &content));
        let rendered = default.render(&source, &content);
        prop_assert_eq!(default.recover(&rendered), name);
    }

    #[test]
    fn recover_never_panics(template in "[a-z\\[\\]\\.]{0,20}", file in "[a-z0-9\\.]{0,20}") {
        let _ = FilenameTemplate::new(template).recover(&file);
    }

    #[test]
    fn relative_key_uses_forward_slashes(parts in prop::collection::vec("[a-z0-9]{1,8}", 1..5)) {
        let root = Path::new("/project");
        let path = parts.iter().fold(root.to_path_buf(), |acc, p| acc.join(p));
        prop_assert_eq!(relative_key(root, &path), parts.join("/"));
    }
}
