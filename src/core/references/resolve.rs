//! Namespace resolution of a matched reference to exactly one resource entry.
//!
//! A reference matches every entry registered under its `ClassName.Key`
//! text. Which one the code actually means depends on where the code sits:
//!
//! - qualified (`NsA.Form.Key1`, `global::NsA.Form.Key1`, `Alias::Form.Key1`,
//!   VB `My.Resources.Key`): the qualifier names the namespace, tried as
//!   written, through an alias, relative to each enclosing namespace and, for
//!   VB, under the project's root namespace
//! - bare (`Form.Key1`): the preferred origin wins, then the innermost
//!   enclosing namespace holding a candidate, then the imported namespaces
//!
//! Resolution never guesses: more than one remaining candidate resolves to
//! nothing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::lang::LanguageRules;
use crate::core::resources::{ResourceEntry, ResourceId};
use crate::core::trie::CaseSensitivity;

/// Where the scanned code sits: its namespace and the names it imports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceContext {
    /// Enclosing namespace of the fragment (empty for the global namespace).
    #[serde(default)]
    pub namespace: String,
    /// `using` / `Imports` namespaces in effect.
    #[serde(default)]
    pub imports: Vec<String>,
    /// `using Alias = Some.Namespace;` / `Imports Alias = Some.Namespace`.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
    /// VB project root namespace, implicitly prefixed to every declared namespace.
    #[serde(default)]
    pub root_namespace: Option<String>,
}

impl NamespaceContext {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    pub fn with_import(mut self, namespace: impl Into<String>) -> Self {
        self.imports.push(namespace.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>, namespace: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), namespace.into());
        self
    }

    pub fn with_root_namespace(mut self, root: impl Into<String>) -> Self {
        self.root_namespace = Some(root.into());
        self
    }

    /// Enclosing namespaces, innermost first, ending with the global namespace.
    ///
    /// `A.B` yields `A.B`, `A`, `""`.
    pub fn scopes(&self) -> Vec<String> {
        let mut scopes = Vec::new();
        let mut current = self.namespace.trim_matches('.');
        while !current.is_empty() {
            scopes.push(current.to_string());
            current = current.rfind('.').map_or("", |dot| &current[..dot]);
        }
        scopes.push(String::new());
        scopes
    }

    fn rooted(&self, namespace: &str) -> Option<String> {
        let root = self.root_namespace.as_deref().filter(|r| !r.is_empty())?;
        Some(join(root, namespace))
    }

    fn alias_target(&self, alias: &str, case: CaseSensitivity) -> Option<&str> {
        self.aliases
            .iter()
            .find(|(name, _)| names_equal(name, alias, case))
            .map(|(_, target)| target.as_str())
    }
}

/// Pick the entry a reference means, or `None` when no single entry fits.
///
/// `prefix` is the qualifier written before `ClassName.Key`, without its
/// trailing separator.
pub fn resolve<'e>(
    candidates: &'e [ResourceEntry],
    prefix: Option<&str>,
    context: &NamespaceContext,
    preferred_origin: Option<&ResourceId>,
    rules: &(impl LanguageRules + ?Sized),
) -> Option<&'e ResourceEntry> {
    let resolver = Resolver {
        candidates,
        context,
        preferred_origin,
        case: rules.case_sensitivity(),
        global_qualifier: rules.global_qualifier(),
    };
    match prefix {
        Some(prefix) => resolver.qualified(prefix),
        None => resolver.bare(),
    }
}

struct Resolver<'a, 'e> {
    candidates: &'e [ResourceEntry],
    context: &'a NamespaceContext,
    preferred_origin: Option<&'a ResourceId>,
    case: CaseSensitivity,
    global_qualifier: Option<&'static str>,
}

/// Outcome of looking for candidates in one namespace.
enum Lookup<'e> {
    Found(&'e ResourceEntry),
    Ambiguous,
    Empty,
}

impl<'e> Resolver<'_, 'e> {
    fn qualified(&self, prefix: &str) -> Option<&'e ResourceEntry> {
        if let Some(absolute) = self.strip_global(prefix) {
            return self.first_hit([absolute.to_string()]);
        }

        let mut namespaces = vec![prefix.to_string()];
        if let Some(expanded) = self.expand_alias(prefix) {
            namespaces.push(expanded);
        }
        let relative: Vec<String> = self
            .context
            .scopes()
            .into_iter()
            .filter(|scope| !scope.is_empty())
            .map(|scope| join(&scope, prefix))
            .collect();
        namespaces.extend(relative);
        namespaces.extend(self.context.rooted(prefix));

        self.first_hit(namespaces)
    }

    fn bare(&self) -> Option<&'e ResourceEntry> {
        if let Some(preferred) = self.preferred_origin {
            let from_preferred: Vec<&'e ResourceEntry> = self
                .candidates
                .iter()
                .filter(|entry| &entry.origin == preferred)
                .collect();
            if let [only] = from_preferred.as_slice() {
                return Some(*only);
            }
        }

        let plain = self.context.scopes();
        let mut scopes: Vec<String> = plain
            .iter()
            .filter_map(|scope| self.context.rooted(scope))
            .collect();
        scopes.extend(plain);
        match self.first_lookup(scopes) {
            Lookup::Found(entry) => return Some(entry),
            Lookup::Ambiguous => return None,
            Lookup::Empty => {}
        }

        let imported: Vec<&'e ResourceEntry> = self
            .candidates
            .iter()
            .filter(|entry| {
                self.context.imports.iter().any(|import| {
                    names_equal(&entry.namespace, import, self.case)
                        || self
                            .context
                            .rooted(import)
                            .is_some_and(|rooted| names_equal(&entry.namespace, &rooted, self.case))
                })
            })
            .collect();
        match self.pick(imported) {
            Lookup::Found(entry) => Some(entry),
            Lookup::Ambiguous | Lookup::Empty => None,
        }
    }

    /// Try each namespace in order; the first one holding candidates decides.
    fn first_hit(&self, namespaces: impl IntoIterator<Item = String>) -> Option<&'e ResourceEntry> {
        match self.first_lookup(namespaces) {
            Lookup::Found(entry) => Some(entry),
            Lookup::Ambiguous | Lookup::Empty => None,
        }
    }

    fn first_lookup(&self, namespaces: impl IntoIterator<Item = String>) -> Lookup<'e> {
        for namespace in namespaces {
            match self.lookup(&namespace) {
                Lookup::Empty => continue,
                decided => return decided,
            }
        }
        Lookup::Empty
    }

    fn lookup(&self, namespace: &str) -> Lookup<'e> {
        let matching = self
            .candidates
            .iter()
            .filter(|entry| names_equal(&entry.namespace, namespace, self.case))
            .collect();
        self.pick(matching)
    }

    /// Narrow several candidates down to the preferred origin when possible.
    fn pick(&self, matching: Vec<&'e ResourceEntry>) -> Lookup<'e> {
        match matching.as_slice() {
            [] => Lookup::Empty,
            [only] => Lookup::Found(*only),
            several => {
                let preferred: Vec<&&'e ResourceEntry> = several
                    .iter()
                    .filter(|entry| Some(&entry.origin) == self.preferred_origin)
                    .collect();
                match preferred.as_slice() {
                    [only] => Lookup::Found(**only),
                    _ => Lookup::Ambiguous,
                }
            }
        }
    }

    fn strip_global<'p>(&self, prefix: &'p str) -> Option<&'p str> {
        let qualifier = self.global_qualifier?;
        // `global::Form.Key1` leaves just `global` once the separator is trimmed.
        if names_equal(prefix, qualifier.trim_end_matches([':', '.']), self.case) {
            return Some("");
        }
        let head = prefix.get(..qualifier.len())?;
        names_equal(head, qualifier, self.case).then(|| &prefix[qualifier.len()..])
    }

    /// `Alias::Rest` or `Alias.Rest` with `Alias` replaced by its target.
    fn expand_alias(&self, prefix: &str) -> Option<String> {
        let (alias, rest) = match prefix.split_once("::") {
            Some((alias, rest)) => (alias, Some(rest)),
            None => match prefix.split_once('.') {
                Some((alias, rest)) => (alias, Some(rest)),
                None => (prefix, None),
            },
        };
        let target = self.context.alias_target(alias, self.case)?;
        Some(match rest {
            Some(rest) => join(target, rest),
            None => target.to_string(),
        })
    }
}

fn join(namespace: &str, name: &str) -> String {
    match (namespace.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (_, true) => namespace.to_string(),
        _ => format!("{namespace}.{name}"),
    }
}

fn names_equal(a: &str, b: &str, case: CaseSensitivity) -> bool {
    match case {
        CaseSensitivity::Sensitive => a == b,
        CaseSensitivity::Insensitive => {
            a.chars().count() == b.chars().count()
                && a.chars().zip(b.chars()).all(|(x, y)| case.fold(x) == case.fold(y))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::lang::{CSharpRules, VbRules};
    use crate::core::references::resolve::*;
    use pretty_assertions::assert_eq;

    fn entry(namespace: &str, origin: &str) -> ResourceEntry {
        ResourceEntry::new(namespace, "Form", "Key1", namespace, origin)
    }

    fn two_namespaces() -> Vec<ResourceEntry> {
        vec![entry("NsA", "a.resx"), entry("NsB", "b.resx")]
    }

    fn resolved_namespace(
        candidates: &[ResourceEntry],
        prefix: Option<&str>,
        context: &NamespaceContext,
    ) -> Option<String> {
        resolve(candidates, prefix, context, None, &CSharpRules).map(|e| e.namespace.clone())
    }

    #[test]
    fn test_scopes_innermost_first() {
        let context = NamespaceContext::new("App.Web.Pages");
        assert_eq!(context.scopes(), vec!["App.Web.Pages", "App.Web", "App", ""]);
        assert_eq!(NamespaceContext::default().scopes(), vec![""]);
    }

    #[test]
    fn test_bare_reference_uses_enclosing_namespace() {
        let candidates = two_namespaces();
        assert_eq!(
            resolved_namespace(&candidates, None, &NamespaceContext::new("NsA")),
            Some("NsA".to_string())
        );
        assert_eq!(
            resolved_namespace(&candidates, None, &NamespaceContext::new("NsB.Inner")),
            Some("NsB".to_string())
        );
    }

    #[test]
    fn test_bare_reference_outside_both_is_ambiguous() {
        let candidates = two_namespaces();
        let context = NamespaceContext::new("Other");
        assert_eq!(resolved_namespace(&candidates, None, &context), None);
    }

    #[test]
    fn test_bare_reference_through_import() {
        let candidates = two_namespaces();
        let context = NamespaceContext::new("Other").with_import("NsB");
        assert_eq!(
            resolved_namespace(&candidates, None, &context),
            Some("NsB".to_string())
        );
    }

    #[test]
    fn test_preferred_origin_outranks_scope() {
        let candidates = two_namespaces();
        let context = NamespaceContext::new("NsA");
        let preferred = ResourceId::from("b.resx");
        let found = resolve(&candidates, None, &context, Some(&preferred), &CSharpRules);
        assert_eq!(found.map(|e| e.namespace.as_str()), Some("NsB"));
    }

    #[test]
    fn test_qualified_reference() {
        let candidates = two_namespaces();
        let context = NamespaceContext::new("NsA");
        assert_eq!(
            resolved_namespace(&candidates, Some("NsB"), &context),
            Some("NsB".to_string())
        );
        assert_eq!(resolved_namespace(&candidates, Some("NsC"), &context), None);
    }

    #[test]
    fn test_qualified_reference_relative_to_enclosing_namespace() {
        let candidates = vec![entry("App.Properties", "p.resx")];
        let context = NamespaceContext::new("App.Web");
        assert_eq!(
            resolved_namespace(&candidates, Some("Properties"), &context),
            Some("App.Properties".to_string())
        );
    }

    #[test]
    fn test_global_qualifier_is_absolute() {
        let candidates = vec![entry("Properties", "root.resx"), entry("App.Properties", "p.resx")];
        let context = NamespaceContext::new("App");
        assert_eq!(
            resolved_namespace(&candidates, Some("global::Properties"), &context),
            Some("Properties".to_string())
        );
    }

    #[test]
    fn test_alias_expansion() {
        let candidates = two_namespaces();
        let context = NamespaceContext::new("Other").with_alias("B", "NsB");
        assert_eq!(
            resolved_namespace(&candidates, Some("B"), &context),
            Some("NsB".to_string())
        );

        let nested = vec![entry("Company.Strings", "s.resx")];
        let context = NamespaceContext::new("Other").with_alias("Co", "Company");
        assert_eq!(
            resolved_namespace(&nested, Some("Co::Strings"), &context),
            Some("Company.Strings".to_string())
        );
    }

    #[test]
    fn test_vb_root_namespace_and_case() {
        let candidates = vec![entry("MyApp.My", "my.resx")];
        let context = NamespaceContext::new("").with_root_namespace("MyApp");
        let found = resolve(&candidates, Some("my"), &context, None, &VbRules);
        assert_eq!(found.map(|e| e.namespace.as_str()), Some("MyApp.My"));

        let found = resolve(&candidates, Some("my"), &context, None, &CSharpRules);
        assert!(found.is_none());
    }

    #[test]
    fn test_vb_bare_reference_under_root_namespace() {
        let candidates = vec![entry("MyApp.Forms", "f.resx"), entry("Forms", "other.resx")];
        let context = NamespaceContext::new("Forms").with_root_namespace("MyApp");
        let found = resolve(&candidates, None, &context, None, &VbRules);
        assert_eq!(found.map(|e| e.namespace.as_str()), Some("MyApp.Forms"));
    }

    #[test]
    fn test_vb_global_qualifier() {
        let candidates = vec![entry("MyApp.Forms", "f.resx")];
        let context = NamespaceContext::new("Other").with_root_namespace("MyApp");
        let found = resolve(&candidates, Some("Global.MyApp.Forms"), &context, None, &VbRules);
        assert_eq!(found.map(|e| e.namespace.as_str()), Some("MyApp.Forms"));
    }
}
