//! Prompt fragment models.
//!
//! A [`PromptFragment`] holds template text with `{name}` placeholders and an
//! ordered list of [`Variable`] substitutions. A [`CompositePrompt`] aggregates
//! fragments through [`SharedFragment`] handles and joins their rendered output
//! with a single space.
//!
//! # Substitution Rules
//!
//! Rendering folds over the variable list in order. Each variable replaces the
//! **first** remaining occurrence of the literal text `{key}` with its value:
//!
//! | Content | Variables | Rendered |
//! |---------|-----------|----------|
//! | `Hi {a} {a}` | `a=x` | `Hi x {a}` |
//! | `Hi {a} {a}` | `a=x`, `a=y` | `Hi x y` |
//! | `Hello {name}` | none | `Hello {name}` |
//! | `{a}{b}` | `a={b}`, `b=z` | `z{b}` |
//! | `{a}{b}` | `a=1`, `b={a}` | `1{a}` |
//!
//! Placeholders without a matching variable are left as-is, and malformed
//! braces are treated as literal text. Values are inserted verbatim.
//!
//! # Sharing
//!
//! Composites aggregate fragments by reference. Updating a fragment through any
//! clone of its [`SharedFragment`] handle is visible to every composite that
//! holds it:
//!
//! ```rust
//! use promptweave::models::{CompositePrompt, PromptFragment, Variable};
//!
//! let history = PromptFragment::with_variables(
//!     "What is the history of {subject}?",
//!     vec![Variable::new("subject", "the Roman Empire")],
//! )
//! .into_shared();
//!
//! let composite = CompositePrompt::new(vec![history.clone()]);
//! history.update_variable("subject", "ancient Greece");
//!
//! assert_eq!(composite.render(), "What is the history of ancient Greece?");
//! ```

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

/// Header line emitted by [`CompositePrompt::introspect`].
pub const INTROSPECT_HEADER: &str = "Fragments in the Complex Prompt:";

/// Separator placed between rendered fragments.
const FRAGMENT_SEPARATOR: &str = " ";

/// Unique identifier for a prompt fragment.
///
/// Used for introspection and logging only. Two fragments with identical
/// content and variables still carry distinct ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FragmentId(String);

impl FragmentId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FragmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A key/value substitution applied to a fragment's `{key}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Placeholder name (without braces).
    pub key: String,
    /// Replacement text.
    pub value: String,
}

impl Variable {
    /// Creates a new variable.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Returns the literal placeholder text this variable replaces.
    #[must_use]
    pub fn placeholder(&self) -> String {
        format!("{{{}}}", self.key)
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for Variable {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

/// A unit of template text plus its own substitution variables.
#[derive(Debug, Clone)]
pub struct PromptFragment {
    id: FragmentId,
    content: String,
    variables: Vec<Variable>,
}

impl PromptFragment {
    /// Creates a fragment with no variables.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self::with_variables(content, Vec::new())
    }

    /// Creates a fragment with an initial variable list.
    ///
    /// The list is stored as given; placeholder syntax is not validated.
    #[must_use]
    pub fn with_variables(content: impl Into<String>, variables: Vec<Variable>) -> Self {
        Self {
            id: FragmentId::generate(),
            content: content.into(),
            variables,
        }
    }

    /// Returns the fragment's identifier.
    #[must_use]
    pub const fn id(&self) -> &FragmentId {
        &self.id
    }

    /// Returns the unrendered template text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the substitution list in order.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Replaces the template text.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Sets `key` to `value`.
    ///
    /// Overwrites the first variable whose key matches exactly, or appends a new
    /// one when none does. Existing entries keep their order.
    pub fn update_variable(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        if let Some(existing) = self.variables.iter_mut().find(|v| v.key == key) {
            existing.value = value;
            tracing::debug!(fragment_id = %self.id, key = %key, "replaced variable");
        } else {
            tracing::debug!(fragment_id = %self.id, key = %key, "appended variable");
            self.variables.push(Variable { key, value });
        }
    }

    /// Renders the fragment.
    ///
    /// Each variable, in list order, replaces the first remaining `{key}`
    /// occurrence. Unmatched placeholders stay in the output.
    #[must_use]
    pub fn render(&self) -> String {
        let rendered = self
            .variables
            .iter()
            .fold(self.content.clone(), |content, variable| {
                content.replacen(&variable.placeholder(), &variable.value, 1)
            });
        tracing::trace!(fragment_id = %self.id, len = rendered.len(), "rendered fragment");
        rendered
    }

    /// Wraps the fragment in a shared handle for use in a [`CompositePrompt`].
    #[must_use]
    pub fn into_shared(self) -> SharedFragment {
        SharedFragment::new(self)
    }
}

impl fmt::Display for PromptFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Shared handle to a [`PromptFragment`].
///
/// Cloning the handle shares the fragment, so updates made through one clone are
/// seen by all of them. Accessors return owned values; no borrow of the
/// fragment outlives a single call.
#[derive(Debug, Clone)]
pub struct SharedFragment(Rc<RefCell<PromptFragment>>);

impl SharedFragment {
    /// Wraps a fragment.
    #[must_use]
    pub fn new(fragment: PromptFragment) -> Self {
        Self(Rc::new(RefCell::new(fragment)))
    }

    /// Returns `true` if both handles point at the same fragment.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// Returns a copy of the fragment's identifier.
    #[must_use]
    pub fn id(&self) -> FragmentId {
        self.0.borrow().id().clone()
    }

    /// Returns a copy of the unrendered template text.
    #[must_use]
    pub fn content(&self) -> String {
        self.0.borrow().content().to_string()
    }

    /// Returns a copy of the substitution list.
    #[must_use]
    pub fn variables(&self) -> Vec<Variable> {
        self.0.borrow().variables().to_vec()
    }

    /// See [`PromptFragment::set_content`].
    pub fn set_content(&self, content: impl Into<String>) {
        self.0.borrow_mut().set_content(content);
    }

    /// See [`PromptFragment::update_variable`].
    pub fn update_variable(&self, key: impl Into<String>, value: impl Into<String>) {
        self.0.borrow_mut().update_variable(key, value);
    }

    /// See [`PromptFragment::render`].
    #[must_use]
    pub fn render(&self) -> String {
        self.0.borrow().render()
    }
}

impl From<PromptFragment> for SharedFragment {
    fn from(fragment: PromptFragment) -> Self {
        Self::new(fragment)
    }
}

/// Point-in-time view of a fragment inside a composite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentSnapshot {
    /// Fragment identifier.
    pub id: FragmentId,
    /// Rendered content at snapshot time.
    pub content: String,
}

/// An ordered aggregation of fragments rendered and joined together.
#[derive(Debug, Clone, Default)]
pub struct CompositePrompt {
    fragments: Vec<SharedFragment>,
}

impl CompositePrompt {
    /// Creates a composite from an ordered list of fragments.
    #[must_use]
    pub const fn new(fragments: Vec<SharedFragment>) -> Self {
        Self { fragments }
    }

    /// Returns the fragments in order.
    #[must_use]
    pub fn fragments(&self) -> &[SharedFragment] {
        &self.fragments
    }

    /// Returns the number of fragments.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Returns `true` if the composite has no fragments.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Appends a fragment to the end.
    pub fn add_fragment(&mut self, fragment: impl Into<SharedFragment>) {
        self.fragments.push(fragment.into());
    }

    /// Renders every fragment and joins the results with a single space.
    #[must_use]
    pub fn render(&self) -> String {
        let rendered: Vec<String> = self.fragments.iter().map(SharedFragment::render).collect();
        tracing::trace!(fragments = rendered.len(), "rendered composite");
        rendered.join(FRAGMENT_SEPARATOR)
    }

    /// Captures the id and rendered content of every fragment.
    #[must_use]
    pub fn snapshots(&self) -> Vec<FragmentSnapshot> {
        self.fragments
            .iter()
            .map(|fragment| FragmentSnapshot {
                id: fragment.id(),
                content: fragment.render(),
            })
            .collect()
    }

    /// Writes the introspection listing to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn introspect_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{INTROSPECT_HEADER}")?;
        for snapshot in self.snapshots() {
            writeln!(out, "ID: {}, Content: {}", snapshot.id, snapshot.content)?;
        }
        Ok(())
    }

    /// Prints the introspection listing to standard output.
    ///
    /// # Errors
    ///
    /// Returns an error if standard output cannot be written.
    pub fn introspect(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        self.introspect_to(&mut handle)?;
        handle.flush()
    }
}

impl FromIterator<SharedFragment> for CompositePrompt {
    fn from_iter<I: IntoIterator<Item = SharedFragment>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for CompositePrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn fragment(content: &str, vars: &[(&str, &str)]) -> PromptFragment {
        PromptFragment::with_variables(
            content,
            vars.iter().map(|&(k, v)| Variable::new(k, v)).collect(),
        )
    }

    #[test_case("Tell me about {topic}.", &[("topic", "artificial intelligence")], "Tell me about artificial intelligence." ; "single placeholder")]
    #[test_case("Hello {name}", &[], "Hello {name}" ; "unmatched placeholder")]
    #[test_case("Hi {a} {a}", &[("a", "x")], "Hi x {a}" ; "first occurrence only")]
    #[test_case("Hi {a} {a}", &[("a", "x"), ("a", "y")], "Hi x y" ; "duplicate keys consume occurrences")]
    #[test_case("{a}{b}", &[("a", "{b}"), ("b", "z")], "z{b}" ; "later variables see earlier replacements")]
    #[test_case("{a}{b}", &[("a", "1"), ("b", "{a}")], "1{a}" ; "earlier replacements are not revisited")]
    #[test_case("Unclosed {name and }", &[("name", "x")], "Unclosed {name and }" ; "malformed braces are literal")]
    #[test_case("{Name}", &[("name", "x")], "{Name}" ; "keys are case sensitive")]
    #[test_case("cost: {price}", &[("price", "$& $1")], "cost: $& $1" ; "values are inserted verbatim")]
    #[test_case("{}", &[("", "empty")], "empty" ; "empty key matches empty braces")]
    fn test_render(content: &str, vars: &[(&str, &str)], expected: &str) {
        assert_eq!(fragment(content, vars).render(), expected);
    }

    #[test]
    fn test_render_without_variables_returns_content() {
        let f = PromptFragment::new("No {placeholders} touched here.");
        assert_eq!(f.render(), f.content());
    }

    #[test]
    fn test_render_does_not_mutate() {
        let f = fragment("Tell me about {topic}.", &[("topic", "AI")]);
        let first = f.render();
        let second = f.render();

        assert_eq!(first, second);
        assert_eq!(f.content(), "Tell me about {topic}.");
        assert_eq!(f.variables(), &[Variable::new("topic", "AI")]);
    }

    #[test]
    fn test_update_variable_overwrites_in_place() {
        let mut f = fragment("{a} {b}", &[("a", "1"), ("b", "2")]);
        f.update_variable("a", "one");
        f.update_variable("a", "uno");

        assert_eq!(
            f.variables(),
            &[Variable::new("a", "uno"), Variable::new("b", "2")]
        );
        assert_eq!(f.render(), "uno 2");
    }

    #[test]
    fn test_update_variable_appends_missing_key() {
        let mut f = fragment("{a} {b}", &[("a", "1")]);
        f.update_variable("b", "2");

        assert_eq!(
            f.variables(),
            &[Variable::new("a", "1"), Variable::new("b", "2")]
        );
    }

    #[test]
    fn test_update_variable_only_touches_first_duplicate() {
        let mut f = fragment("{a} {a}", &[("a", "x"), ("a", "y")]);
        f.update_variable("a", "z");

        assert_eq!(
            f.variables(),
            &[Variable::new("a", "z"), Variable::new("a", "y")]
        );
        assert_eq!(f.render(), "z y");
    }

    #[test]
    fn test_set_content() {
        let mut f = fragment("Hello {name}", &[("name", "Ada")]);
        f.set_content("Goodbye {name}");
        assert_eq!(f.render(), "Goodbye Ada");
    }

    #[test]
    fn test_fragment_ids_are_unique() {
        let a = PromptFragment::new("same");
        let b = PromptFragment::new("same");

        assert!(!a.id().as_str().is_empty());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_fragment_id_is_canonical_uuid() {
        let f = PromptFragment::new("x");
        assert!(uuid::Uuid::parse_str(f.id().as_str()).is_ok());
        assert_eq!(f.id().as_str().len(), 36);
    }

    #[test]
    fn test_fresh_variable_list_per_fragment() {
        let mut a = PromptFragment::new("{k}");
        let b = PromptFragment::new("{k}");
        a.update_variable("k", "v");

        assert_eq!(a.variables().len(), 1);
        assert!(b.variables().is_empty());
    }

    #[test]
    fn test_display_matches_render() {
        let f = fragment("Hi {who}", &[("who", "there")]);
        assert_eq!(f.to_string(), f.render());
    }

    #[test]
    fn test_variable_from_tuple() {
        let v: Variable = ("topic", "rust").into();
        assert_eq!(v, Variable::new("topic", "rust"));
        assert_eq!(v.placeholder(), "{topic}");
    }

    #[test]
    fn test_shared_fragment_updates_are_visible_to_clones() {
        let shared = fragment("{x}", &[("x", "1")]).into_shared();
        let other = shared.clone();
        other.update_variable("x", "2");

        assert!(SharedFragment::ptr_eq(&shared, &other));
        assert_eq!(shared.render(), "2");
        assert_eq!(shared.variables(), vec![Variable::new("x", "2")]);
    }

    #[test]
    fn test_shared_fragment_content_tracks_set_content() {
        let shared = fragment("Hi {x}", &[]).into_shared();
        let other = shared.clone();
        other.set_content("Bye {x}");

        assert_eq!(shared.content(), "Bye {x}");
        assert_eq!(shared.render(), "Bye {x}");
    }

    #[test]
    fn test_update_while_snapshot_and_views_are_held() {
        let shared = fragment("{a}", &[("a", "1")]).into_shared();
        let composite = CompositePrompt::new(vec![shared.clone()]);

        let snapshots = composite.snapshots();
        let variables = composite.fragments()[0].variables();
        let content = composite.fragments()[0].content();
        shared.update_variable("a", "2");
        shared.set_content("[{a}]");

        assert_eq!(snapshots[0].content, "1");
        assert_eq!(variables, vec![Variable::new("a", "1")]);
        assert_eq!(content, "{a}");
        assert_eq!(composite.render(), "[2]");
    }

    #[test]
    fn test_composite_render_joins_with_space() {
        let composite: CompositePrompt = [
            fragment("Tell me about {topic}.", &[("topic", "artificial intelligence")]),
            fragment("What is the history of {subject}?", &[("subject", "the Roman Empire")]),
        ]
        .into_iter()
        .map(SharedFragment::from)
        .collect();

        assert_eq!(
            composite.render(),
            "Tell me about artificial intelligence. What is the history of the Roman Empire?"
        );
        assert_eq!(composite.to_string(), composite.render());
    }

    #[test]
    fn test_composite_empty_renders_empty_string() {
        let composite = CompositePrompt::default();
        assert!(composite.is_empty());
        assert_eq!(composite.render(), "");
    }

    #[test]
    fn test_composite_keeps_empty_fragments() {
        let composite = CompositePrompt::new(vec![
            PromptFragment::new("a").into_shared(),
            PromptFragment::new("").into_shared(),
            PromptFragment::new("b").into_shared(),
        ]);
        assert_eq!(composite.render(), "a  b");
    }

    #[test]
    fn test_add_fragment_appends() {
        let first = PromptFragment::new("first").into_shared();
        let last = PromptFragment::new("last").into_shared();
        let mut composite = CompositePrompt::new(vec![first.clone()]);
        composite.add_fragment(last.clone());

        assert_eq!(composite.len(), 2);
        assert!(SharedFragment::ptr_eq(&composite.fragments()[0], &first));
        assert!(SharedFragment::ptr_eq(&composite.fragments()[1], &last));
        assert_eq!(composite.render(), "first last");
    }

    #[test]
    fn test_introspect_to_lists_each_fragment() {
        let a = fragment("Hi {x}", &[("x", "there")]).into_shared();
        let b = PromptFragment::new("Bye").into_shared();
        let composite = CompositePrompt::new(vec![a.clone(), b.clone()]);

        let mut out = Vec::new();
        composite.introspect_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let expected = format!(
            "{INTROSPECT_HEADER}\nID: {}, Content: Hi there\nID: {}, Content: Bye\n",
            a.id(),
            b.id()
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_snapshots_serialize() {
        let a = fragment("Hi {x}", &[("x", "there")]).into_shared();
        let composite = CompositePrompt::new(vec![a.clone()]);

        let json = serde_json::to_value(composite.snapshots()).unwrap();
        assert_eq!(json[0]["id"], a.id().as_str());
        assert_eq!(json[0]["content"], "Hi there");
    }
}
