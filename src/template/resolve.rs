use super::hole::{Hole, Sigil};

/// Base name for a hole, without its sigil prefix.
///
/// Precedence: the `named(..)` wrapper, the name written in the template,
/// the argument's source text, and finally the positional `arg{index}`.
pub fn base_name(hole: &Hole) -> String {
    if let Some(name) = &hole.explicit_name {
        return name.clone();
    }
    if let Some(name) = &hole.template_name {
        return name.clone();
    }
    hole.source
        .as_deref()
        .and_then(derive_name)
        .unwrap_or_else(|| format!("arg{}", hole.index))
}

/// Name derived from argument source text: identifiers pass through, any
/// other expression is reduced to its identifier characters joined by `_`.
/// `destructure(..)` and `stringify(..)` calls are looked through.
pub fn derive_name(source: &str) -> Option<String> {
    let mut text = source.trim();
    loop {
        let stripped = text
            .strip_prefix("&mut ")
            .or_else(|| text.strip_prefix('&'))
            .or_else(|| text.strip_prefix('*'))
            .or_else(|| unwrap_sigil_call(text))
            .map(str::trim_start);
        match stripped {
            Some(rest) => text = rest,
            None => break,
        }
    }
    let text = text.strip_prefix("r#").unwrap_or(text);

    if is_identifier(text) {
        return Some(text.to_string());
    }

    let mut slug = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            slug.push(ch);
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        None
    } else {
        Some(slug.to_string())
    }
}

fn unwrap_sigil_call(text: &str) -> Option<&str> {
    let inner = text.strip_suffix(')')?;
    let (path, arg) = inner.split_once('(')?;
    let function = path.rsplit("::").next()?.trim();
    match function {
        "destructure" | "stringify" if !arg.trim().is_empty() => Some(arg.trim()),
        _ => None,
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Key used in the structured template and argument list.
pub fn structured_key(sigil: Option<Sigil>, base: &str) -> String {
    match sigil {
        Some(sigil) => format!("{}{}", sigil.prefix(), base),
        None => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hole(source: Option<&str>) -> Hole {
        Hole {
            source: source.map(str::to_string),
            explicit_name: None,
            template_name: None,
            sigil: None,
            alignment: None,
            format: None,
            index: 4,
        }
    }

    #[test]
    fn identifiers_are_used_verbatim() {
        assert_eq!(derive_name("value").as_deref(), Some("value"));
        assert_eq!(derive_name("&value").as_deref(), Some("value"));
        assert_eq!(derive_name("&mut *value").as_deref(), Some("value"));
        assert_eq!(derive_name("r#type").as_deref(), Some("type"));
    }

    #[test]
    fn sigil_wrappers_are_transparent() {
        assert_eq!(derive_name("destructure(&value)").as_deref(), Some("value"));
        assert_eq!(
            derive_name("template::stringify(order.id)").as_deref(),
            Some("order_id")
        );
        assert_eq!(derive_name("named(\"x\", v)").as_deref(), Some("named_x_v"));
    }

    #[test]
    fn complex_expressions_become_slugs() {
        assert_eq!(derive_name("user.name").as_deref(), Some("user_name"));
        assert_eq!(derive_name("items.len()").as_deref(), Some("items_len"));
        assert_eq!(derive_name("a + b").as_deref(), Some("a_b"));
        assert_eq!(derive_name("\"text\"").as_deref(), Some("text"));
        assert_eq!(derive_name("()"), None);
    }

    #[test]
    fn explicit_name_beats_template_and_source() {
        let mut h = hole(Some("value"));
        assert_eq!(base_name(&h), "value");
        h.template_name = Some("shown".into());
        assert_eq!(base_name(&h), "shown");
        h.explicit_name = Some("forced".into());
        assert_eq!(base_name(&h), "forced");
    }

    #[test]
    fn positional_name_when_nothing_else() {
        assert_eq!(base_name(&hole(None)), "arg4");
        assert_eq!(base_name(&hole(Some("()"))), "arg4");
    }

    #[test]
    fn sigil_prefixes_only_the_key() {
        assert_eq!(structured_key(Some(Sigil::Destructure), "v"), "@v");
        assert_eq!(structured_key(Some(Sigil::Stringify), "v"), "$v");
        assert_eq!(structured_key(None, "v"), "v");
    }
}
