//! In-memory triple list parsed from an SMW RDF/XML export.
//!
//! Exports are small (one page plus the resources it references), so lookups
//! are linear scans. Triples keep document order, which is what callers see
//! when iterating a subject's properties.

use crate::error::{SmwError, SmwResult};
use crate::ns::RDFS_LABEL;
use oxiri::Iri;
use rio_api::model;
use rio_api::parser::TriplesParser;
use rio_xml::{RdfXmlError, RdfXmlParser};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Iri(String),
    BlankNode(String),
    Literal {
        value: String,
        datatype: Option<String>,
        language: Option<String>,
    },
}

impl Term {
    /// IRI, blank node id, or lexical form of a literal.
    pub fn as_str(&self) -> &str {
        match self {
            Term::Iri(iri) => iri,
            Term::BlankNode(id) => id,
            Term::Literal { value, .. } => value,
        }
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal { .. })
    }

    fn from_subject(subject: model::Subject<'_>) -> Option<Self> {
        match subject {
            model::Subject::NamedNode(node) => Some(Term::Iri(node.iri.to_string())),
            model::Subject::BlankNode(node) => Some(Term::BlankNode(node.id.to_string())),
            _ => None,
        }
    }

    fn from_object(object: model::Term<'_>) -> Option<Self> {
        match object {
            model::Term::NamedNode(node) => Some(Term::Iri(node.iri.to_string())),
            model::Term::BlankNode(node) => Some(Term::BlankNode(node.id.to_string())),
            model::Term::Literal(literal) => Some(match literal {
                model::Literal::Simple { value } => Term::Literal {
                    value: value.to_string(),
                    datatype: None,
                    language: None,
                },
                model::Literal::LanguageTaggedString { value, language } => Term::Literal {
                    value: value.to_string(),
                    datatype: None,
                    language: Some(language.to_string()),
                },
                model::Literal::Typed { value, datatype } => Term::Literal {
                    value: value.to_string(),
                    datatype: Some(datatype.iri.to_string()),
                    language: None,
                },
            }),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    pub subject: Term,
    pub predicate: String,
    pub object: Term,
}

#[derive(Debug, Default)]
pub struct RdfGraph {
    triples: Vec<Triple>,
}

impl RdfGraph {
    /// Parses an RDF/XML document. Relative IRIs resolve against `base_iri`.
    ///
    /// RDF-star quoted triples are skipped.
    pub fn parse_rdf_xml(data: &str, base_iri: Option<&str>) -> SmwResult<Self> {
        let base = base_iri
            .map(|iri| Iri::parse(iri.to_string()))
            .transpose()
            .map_err(|e| SmwError::RdfParse(format!("invalid base IRI: {}", e)))?;

        let mut triples = Vec::new();
        let mut parser = RdfXmlParser::new(data.as_bytes(), base);
        parser
            .parse_all(&mut |t: model::Triple<'_>| -> Result<(), RdfXmlError> {
                if let (Some(subject), Some(object)) =
                    (Term::from_subject(t.subject), Term::from_object(t.object))
                {
                    triples.push(Triple {
                        subject,
                        predicate: t.predicate.iri.to_string(),
                        object,
                    });
                }
                Ok(())
            })
            .map_err(|e| SmwError::RdfParse(e.to_string()))?;

        Ok(Self { triples })
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn triples(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Triples whose subject is the IRI `subject`, in document order.
    pub fn triples_about<'a>(&'a self, subject: &'a str) -> impl Iterator<Item = &'a Triple> + 'a {
        self.triples
            .iter()
            .filter(move |t| t.subject.is_iri() && t.subject.as_str() == subject)
    }

    pub fn objects<'a>(
        &'a self,
        subject: &'a str,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples_about(subject)
            .filter(move |t| t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// First object of `(subject, predicate, ?)`.
    pub fn value(&self, subject: &str, predicate: &str) -> Option<&Term> {
        self.triples
            .iter()
            .find(|t| {
                t.subject.is_iri() && t.subject.as_str() == subject && t.predicate == predicate
            })
            .map(|t| &t.object)
    }

    /// IRI of the first subject whose `rdfs:label` literal equals `label` exactly.
    pub fn subject_with_label(&self, label: &str) -> Option<&str> {
        self.triples
            .iter()
            .find(|t| {
                t.subject.is_iri()
                    && t.predicate == RDFS_LABEL
                    && t.object.is_literal()
                    && t.object.as_str() == label
            })
            .map(|t| t.subject.as_str())
    }
}
