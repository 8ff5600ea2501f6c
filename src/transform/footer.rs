//! Source and contributor sections for component pages.

use std::path::PathBuf;

use url::Url;

use super::Append;

/// Separator between source links.
const LINK_SEPARATOR: &str = " • ";

/// Repository URL builder for `blob` (file) and `tree` (directory) links.
#[derive(Debug, Clone)]
pub struct RepoLinks {
    host: Url,
    repo: String,
    branch: String,
    /// Docs directory inside the repository, e.g. `docs/en-US/component`.
    docs_path: String,
    /// Components directory inside the repository, e.g. `packages/components`.
    components_path: String,
}

impl RepoLinks {
    pub fn new(
        host: Url,
        repo: impl Into<String>,
        branch: impl Into<String>,
        docs_path: impl Into<String>,
        components_path: impl Into<String>,
    ) -> Self {
        Self {
            host,
            repo: repo.into(),
            branch: branch.into(),
            docs_path: docs_path.into(),
            components_path: components_path.into(),
        }
    }

    /// `{host}/{repo}/blob/{branch}/{docs}/{id}.md`
    pub fn doc_url(&self, id: &str) -> String {
        let file = format!("{id}.md");
        self.build("blob", &self.docs_path, &file)
    }

    /// `{host}/{repo}/tree/{branch}/{components}/{id}`
    pub fn component_url(&self, id: &str) -> String {
        self.build("tree", &self.components_path, id)
    }

    fn build(&self, kind: &str, dir: &str, leaf: &str) -> String {
        let mut url = self.host.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(split_segments(&self.repo))
                .push(kind)
                .extend(split_segments(&self.branch))
                .extend(split_segments(dir))
                .push(leaf);
        }
        url.to_string()
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(['/', '\\']).filter(|s| !s.is_empty())
}

/// Footer generator for pages under the component docs directory.
#[derive(Debug, Clone)]
pub struct ComponentFooter {
    links: RepoLinks,
    /// Absolute directory holding one source directory per component.
    components_root: PathBuf,
    /// Script fragment loading the footer locale.
    locale_script: String,
}

impl ComponentFooter {
    pub fn new(
        links: RepoLinks,
        components_root: impl Into<PathBuf>,
        locale_composable: &str,
        footer_locale: &str,
    ) -> Self {
        let locale_script = format!(
            "\nimport {{ useLocale }} from '{locale_composable}'\n\
             import footerLocale from '{footer_locale}'\n\
             const footer = useLocale(footerLocale)\n"
        );
        Self {
            links,
            components_root: components_root.into(),
            locale_script,
        }
    }

    /// Source directory of the component named `id`.
    pub fn component_dir(&self, id: &str) -> PathBuf {
        self.components_root.join(id)
    }

    /// Whether `id` has a source directory.
    pub fn is_component(&self, id: &str) -> bool {
        self.component_dir(id).is_dir()
    }

    /// Queue the locale script, the source section and, for real
    /// components, the contributors section.
    ///
    /// Returns whether the component source directory exists.
    pub fn apply(&self, id: &str, append: &mut Append) -> bool {
        let is_component = self.is_component(id);

        append.script_setups.push(self.locale_script.clone());

        let mut links = Vec::with_capacity(2);
        if is_component {
            links.push(markdown_link("{{ footer.component }}", &self.links.component_url(id)));
        }
        links.push(markdown_link("{{ footer.docs }}", &self.links.doc_url(id)));

        let source = format!("## {{{{ footer.source }}}}\n\n{}\n", links.join(LINK_SEPARATOR));
        let contributors = if is_component {
            format!("\n## {{{{ footer.contributors }}}}\n\n<Contributors id=\"{id}\" />\n")
        } else {
            String::new()
        };

        append.footers.push(source);
        append.footers.push(contributors);
        is_component
    }
}

fn markdown_link(text: &str, href: &str) -> String {
    format!("[{text}]({href})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn links() -> RepoLinks {
        RepoLinks::new(
            Url::parse("https://github.com").unwrap(),
            "element-plus/element-plus",
            "dev",
            "docs/en-US/component",
            "packages/components",
        )
    }

    #[test]
    fn test_doc_url() {
        assert_eq!(
            links().doc_url("button"),
            "https://github.com/element-plus/element-plus/blob/dev/docs/en-US/component/button.md"
        );
    }

    #[test]
    fn test_component_url() {
        assert_eq!(
            links().component_url("button"),
            "https://github.com/element-plus/element-plus/tree/dev/packages/components/button"
        );
    }

    #[test]
    fn test_url_nested_branch_and_host_path() {
        let links = RepoLinks::new(
            Url::parse("https://git.example.com/mirror/").unwrap(),
            "org/lib",
            "release/2.x",
            "docs",
            "src",
        );
        assert_eq!(
            links.component_url("date picker"),
            "https://git.example.com/mirror/org/lib/tree/release/2.x/src/date%20picker"
        );
    }

    #[test]
    fn test_apply_with_component_dir() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("button")).unwrap();
        let footer = ComponentFooter::new(links(), dir.path(), "./locale", "./footer.json");

        let mut append = Append::default();
        assert!(footer.apply("button", &mut append));

        assert_eq!(append.footers.len(), 2);
        let source = &append.footers[0];
        assert!(source.starts_with("## {{ footer.source }}\n\n[{{ footer.component }}]("));
        assert!(source.contains(" • [{{ footer.docs }}]("));
        assert!(source.ends_with(".md)\n"));
        assert_eq!(
            append.footers[1],
            "\n## {{ footer.contributors }}\n\n<Contributors id=\"button\" />\n"
        );
        assert_eq!(
            append.script_setups,
            vec![
                "\nimport { useLocale } from './locale'\nimport footerLocale from './footer.json'\nconst footer = useLocale(footerLocale)\n"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_apply_without_component_dir() {
        let dir = TempDir::new().unwrap();
        let footer = ComponentFooter::new(links(), dir.path(), "./locale", "./footer.json");

        let mut append = Append::default();
        assert!(!footer.apply("color", &mut append));

        assert_eq!(
            append.footers[0],
            "## {{ footer.source }}\n\n[{{ footer.docs }}](https://github.com/element-plus/element-plus/blob/dev/docs/en-US/component/color.md)\n"
        );
        assert_eq!(append.footers[1], "");
        assert_eq!(append.script_setups.len(), 1);
    }

    #[test]
    fn test_plain_file_is_not_component() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("input"), "").unwrap();
        let footer = ComponentFooter::new(links(), dir.path(), "a", "b");
        assert!(!footer.is_component("input"));
    }
}
