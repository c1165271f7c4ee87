//! RDF / SKOS 語彙の IRI

use crate::model::Iri;

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";

pub const SKOS_CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";
pub const SKOS_CONCEPT_SCHEME: &str = "http://www.w3.org/2004/02/skos/core#ConceptScheme";
pub const SKOS_COLLECTION: &str = "http://www.w3.org/2004/02/skos/core#Collection";
pub const SKOS_ORDERED_COLLECTION: &str = "http://www.w3.org/2004/02/skos/core#OrderedCollection";
pub const SKOS_MEMBER: &str = "http://www.w3.org/2004/02/skos/core#member";
pub const SKOS_MEMBER_LIST: &str = "http://www.w3.org/2004/02/skos/core#memberList";

pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
pub const SKOS_ALT_LABEL: &str = "http://www.w3.org/2004/02/skos/core#altLabel";
pub const SKOS_HIDDEN_LABEL: &str = "http://www.w3.org/2004/02/skos/core#hiddenLabel";
pub const SKOS_NOTATION: &str = "http://www.w3.org/2004/02/skos/core#notation";

pub const SKOS_BROADER: &str = "http://www.w3.org/2004/02/skos/core#broader";
pub const SKOS_NARROWER: &str = "http://www.w3.org/2004/02/skos/core#narrower";
pub const SKOS_RELATED: &str = "http://www.w3.org/2004/02/skos/core#related";
pub const SKOS_BROADER_TRANSITIVE: &str = "http://www.w3.org/2004/02/skos/core#broaderTransitive";
pub const SKOS_NARROWER_TRANSITIVE: &str = "http://www.w3.org/2004/02/skos/core#narrowerTransitive";

pub const SKOS_IN_SCHEME: &str = "http://www.w3.org/2004/02/skos/core#inScheme";
pub const SKOS_TOP_CONCEPT_OF: &str = "http://www.w3.org/2004/02/skos/core#topConceptOf";
pub const SKOS_HAS_TOP_CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#hasTopConcept";

pub const SKOS_EXACT_MATCH: &str = "http://www.w3.org/2004/02/skos/core#exactMatch";
pub const SKOS_CLOSE_MATCH: &str = "http://www.w3.org/2004/02/skos/core#closeMatch";
pub const SKOS_BROAD_MATCH: &str = "http://www.w3.org/2004/02/skos/core#broadMatch";
pub const SKOS_NARROW_MATCH: &str = "http://www.w3.org/2004/02/skos/core#narrowMatch";
pub const SKOS_RELATED_MATCH: &str = "http://www.w3.org/2004/02/skos/core#relatedMatch";

/// Marker predicate: a consequent using it reports a violation instead of a plain fact
pub const VIOLATION: &str = "urn:x-kotoba:validation#violation";

pub fn rdf_type() -> Iri { Iri::new(RDF_TYPE) }
pub fn rdf_first() -> Iri { Iri::new(RDF_FIRST) }
pub fn rdf_rest() -> Iri { Iri::new(RDF_REST) }
pub fn rdf_nil() -> Iri { Iri::new(RDF_NIL) }

pub fn skos_concept() -> Iri { Iri::new(SKOS_CONCEPT) }
pub fn skos_concept_scheme() -> Iri { Iri::new(SKOS_CONCEPT_SCHEME) }
pub fn skos_collection() -> Iri { Iri::new(SKOS_COLLECTION) }
pub fn skos_ordered_collection() -> Iri { Iri::new(SKOS_ORDERED_COLLECTION) }
pub fn skos_member() -> Iri { Iri::new(SKOS_MEMBER) }
pub fn skos_member_list() -> Iri { Iri::new(SKOS_MEMBER_LIST) }

pub fn skos_pref_label() -> Iri { Iri::new(SKOS_PREF_LABEL) }
pub fn skos_alt_label() -> Iri { Iri::new(SKOS_ALT_LABEL) }
pub fn skos_hidden_label() -> Iri { Iri::new(SKOS_HIDDEN_LABEL) }
pub fn skos_notation() -> Iri { Iri::new(SKOS_NOTATION) }

pub fn skos_broader() -> Iri { Iri::new(SKOS_BROADER) }
pub fn skos_narrower() -> Iri { Iri::new(SKOS_NARROWER) }
pub fn skos_related() -> Iri { Iri::new(SKOS_RELATED) }
pub fn skos_broader_transitive() -> Iri { Iri::new(SKOS_BROADER_TRANSITIVE) }
pub fn skos_narrower_transitive() -> Iri { Iri::new(SKOS_NARROWER_TRANSITIVE) }

pub fn skos_in_scheme() -> Iri { Iri::new(SKOS_IN_SCHEME) }
pub fn skos_top_concept_of() -> Iri { Iri::new(SKOS_TOP_CONCEPT_OF) }
pub fn skos_has_top_concept() -> Iri { Iri::new(SKOS_HAS_TOP_CONCEPT) }

pub fn skos_exact_match() -> Iri { Iri::new(SKOS_EXACT_MATCH) }
pub fn skos_close_match() -> Iri { Iri::new(SKOS_CLOSE_MATCH) }
pub fn skos_broad_match() -> Iri { Iri::new(SKOS_BROAD_MATCH) }
pub fn skos_narrow_match() -> Iri { Iri::new(SKOS_NARROW_MATCH) }
pub fn skos_related_match() -> Iri { Iri::new(SKOS_RELATED_MATCH) }

pub fn violation() -> Iri { Iri::new(VIOLATION) }
