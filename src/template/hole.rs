/// Prefix controlling how a structured backend captures the value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sigil {
    Destructure,
    Stringify,
}

impl Sigil {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '@' => Some(Sigil::Destructure),
            '$' => Some(Sigil::Stringify),
            _ => None,
        }
    }

    pub fn prefix(self) -> char {
        match self {
            Sigil::Destructure => '@',
            Sigil::Stringify => '$',
        }
    }

    /// Split a leading sigil character off `name`.
    pub fn split_prefix(name: &str) -> (Option<Sigil>, &str) {
        let mut chars = name.chars();
        match chars.next().and_then(Sigil::from_char) {
            Some(sigil) => (Some(sigil), chars.as_str()),
            None => (None, name),
        }
    }
}

/// One `{...}` as written in a template fragment, before it is bound to a
/// value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HoleSpec {
    pub sigil: Option<Sigil>,
    pub name: Option<String>,
    pub alignment: Option<i32>,
    pub format: Option<String>,
    /// Byte offset of the opening brace inside its fragment.
    pub offset: usize,
}

/// A parsed hole merged with what its capture says about naming.
#[derive(Clone, Debug, PartialEq)]
pub struct Hole {
    pub source: Option<String>,
    pub explicit_name: Option<String>,
    pub template_name: Option<String>,
    pub sigil: Option<Sigil>,
    pub alignment: Option<i32>,
    pub format: Option<String>,
    /// Position among all holes of the interpolation, literal-valued ones
    /// included.
    pub index: usize,
}
