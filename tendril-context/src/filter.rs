//! Typed predicates for [Context::find](crate::context::Context::find).

use crate::binding::Binding;
use crate::scope::BindingScope;

/// Matches bindings carrying given tag.
pub fn with_tag(tag: &str) -> impl Fn(&Binding) -> bool + '_ {
    move |binding| binding.has_tag(tag)
}

/// Matches bindings carrying any of given tags.
pub fn with_any_tag<'a>(tags: &'a [&'a str]) -> impl Fn(&Binding) -> bool + 'a {
    move |binding| tags.iter().any(|tag| binding.has_tag(tag))
}

/// Matches bindings in one of given scopes.
pub fn in_scopes(scopes: &[BindingScope]) -> impl Fn(&Binding) -> bool + '_ {
    move |binding| scopes.contains(&binding.scope())
}

/// Matches bindings resolving to the same value every time.
pub fn with_shared_scope(binding: &Binding) -> bool {
    binding.scope().is_shared()
}
