//! Data model for SKOS knowledge bases: resources, literals, terms and assertions

use crate::vocabulary;
use serde::{Deserialize, Serialize};

/// RDF IRI wrapper for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Iri(pub String);

impl Iri {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Iri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Iri {
    fn from(s: String) -> Self {
        Iri(s)
    }
}

impl From<&str> for Iri {
    fn from(s: &str) -> Self {
        Iri(s.to_string())
    }
}

/// リテラル値 (言語タグ・データ型付き)
///
/// Language tags are normalized to lowercase on construction, so structural
/// equality doubles as the language-tag-aware comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Literal {
    pub value: String,
    pub language: Option<String>,
    pub datatype: Option<Iri>,
}

impl Literal {
    /// Plain literal without language tag or datatype
    pub fn plain<S: Into<String>>(value: S) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    /// Language-tagged literal
    pub fn with_language<S: Into<String>>(value: S, language: &str) -> Self {
        Self {
            value: value.into(),
            language: Some(language.to_lowercase()),
            datatype: None,
        }
    }

    /// Typed literal (e.g. xsd:integer)
    pub fn typed<S: Into<String>>(value: S, datatype: Iri) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: Some(datatype),
        }
    }

    /// True when both literals carry the same language tag (or both none)
    pub fn same_language(&self, other: &Literal) -> bool {
        self.language == other.language
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.language, &self.datatype) {
            (Some(lang), _) => write!(f, "\"{}\"@{}", self.value, lang),
            (None, Some(dt)) => write!(f, "\"{}\"^^<{}>", self.value, dt),
            (None, None) => write!(f, "\"{}\"", self.value),
        }
    }
}

/// Object position of an assertion: a resource or a literal
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Term {
    Resource(Iri),
    Literal(Literal),
}

impl Term {
    pub fn resource<S: Into<String>>(iri: S) -> Self {
        Term::Resource(Iri::new(iri))
    }

    pub fn as_resource(&self) -> Option<&Iri> {
        match self {
            Term::Resource(iri) => Some(iri),
            Term::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Resource(_) => None,
            Term::Literal(lit) => Some(lit),
        }
    }

    pub fn is_resource(&self) -> bool {
        matches!(self, Term::Resource(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Resource(iri)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Resource(iri) => write!(f, "{}", iri),
            Term::Literal(lit) => write!(f, "{}", lit),
        }
    }
}

/// 主語・述語・目的語のファクト
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Assertion {
    pub subject: Iri,
    pub predicate: Iri,
    pub object: Term,
}

impl Assertion {
    pub fn new(subject: Iri, predicate: Iri, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Assertion whose object is a resource
    pub fn resource(subject: Iri, predicate: Iri, object: Iri) -> Self {
        Self::new(subject, predicate, Term::Resource(object))
    }

    /// Assertion whose object is a literal
    pub fn literal(subject: Iri, predicate: Iri, object: Literal) -> Self {
        Self::new(subject, predicate, Term::Literal(object))
    }

    /// `individual rdf:type class` membership fact
    pub fn class_membership(individual: Iri, class: Iri) -> Self {
        Self::resource(individual, vocabulary::rdf_type(), class)
    }
}

impl std::fmt::Display for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}
