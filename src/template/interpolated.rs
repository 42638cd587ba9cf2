use std::borrow::Cow;
use std::ops::{Add, AddAssign};

use super::value::Capture;

/// One piece of an interpolated expression: a template literal plus the
/// values for its holes, or plain text whose braces carry no meaning.
#[derive(Clone, Debug, PartialEq)]
pub enum Fragment {
    Template {
        text: Cow<'static, str>,
        captures: Vec<Capture>,
    },
    Raw(Cow<'static, str>),
}

/// An interpolated string expression, possibly built from several
/// concatenated fragments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Interpolated {
    fragments: Vec<Fragment>,
}

impl Interpolated {
    pub fn new(text: impl Into<Cow<'static, str>>, captures: Vec<Capture>) -> Self {
        Self {
            fragments: vec![Fragment::Template {
                text: text.into(),
                captures,
            }],
        }
    }

    pub fn raw(text: impl Into<Cow<'static, str>>) -> Self {
        Self {
            fragments: vec![Fragment::Raw(text.into())],
        }
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn into_fragments(self) -> Vec<Fragment> {
        self.fragments
    }

    pub fn append(&mut self, other: Interpolated) {
        self.fragments.extend(other.fragments);
    }
}

impl Add for Interpolated {
    type Output = Interpolated;

    fn add(mut self, rhs: Interpolated) -> Interpolated {
        self.append(rhs);
        self
    }
}

impl AddAssign for Interpolated {
    fn add_assign(&mut self, rhs: Interpolated) {
        self.append(rhs);
    }
}

impl From<&'static str> for Interpolated {
    fn from(text: &'static str) -> Self {
        Interpolated::raw(text)
    }
}

impl From<String> for Interpolated {
    fn from(text: String) -> Self {
        Interpolated::raw(text)
    }
}
