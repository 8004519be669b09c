use handlebars::{handlebars_helper, Handlebars};

use std::fs;
use std::path::Path;

/// Writes `content` to `path`, creating missing parent directories.
pub fn write_string_to_file(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, content.as_bytes())
}

/// Handlebars registry used for destination path templates.
///
/// Strict mode is on so a reference to a configuration field that is not set
/// fails instead of silently rendering an empty path segment. Output is never
/// HTML-escaped since the results are file paths.
pub fn get_handlebars() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars_helper!(trimslash: |s: String| s.trim_end_matches('/').to_string());
    handlebars.register_helper("trimslash", Box::new(trimslash));

    handlebars
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn handlebars_can_render() {
        let handlebars = get_handlebars();
        let res = handlebars
            .render_template("entities/{{name}}.ts", &json!({"name": "foo"}))
            .expect("This to render");
        assert_eq!(res, "entities/foo.ts");
    }

    #[test]
    fn handlebars_does_not_escape_paths() {
        let handlebars = get_handlebars();
        let res = handlebars
            .render_template("{{dir}}/x.ts", &json!({"dir": "src/main/'app'"}))
            .expect("This to render");
        assert_eq!(res, "src/main/'app'/x.ts");
    }

    #[test]
    fn handlebars_strict_mode_rejects_missing_fields() {
        let handlebars = get_handlebars();
        let res = handlebars.render_template("{{missing}}/x.ts", &json!({"dir": "src"}));
        assert!(res.is_err());
    }

    #[test]
    fn handlebars_helper_trimslash_can_render() {
        let handlebars = get_handlebars();
        let res = handlebars
            .render_template(
                "{{trimslash base}}/entities",
                &json!({"base": "src/main/webapp/app/"}),
            )
            .expect("This to render");
        assert_eq!(res, "src/main/webapp/app/entities");
    }

    #[test]
    fn write_string_to_file_creates_parents() {
        let dir = tempfile::tempdir().expect("temp dir");
        let target = dir.path().join("a/b/c.txt");
        write_string_to_file(&target, "hello").expect("write");
        assert_eq!(fs::read_to_string(target).expect("read"), "hello");
    }
}
