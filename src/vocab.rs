//! IRIs of the vocabularies the extraction pipeline understands, and the
//! classification of definienda into documentation sections.

/// Declare a namespace constant plus full-IRI constants for its terms.
macro_rules! vocab {
    ($ns:ident = $base:literal { $($name:ident = $local:literal;)* }) => {
        pub const $ns: &str = $base;
        $( pub const $name: &str = concat!($base, $local); )*
    };
}

vocab!(RDF = "http://www.w3.org/1999/02/22-rdf-syntax-ns#" {
    RDF_TYPE = "type";
    RDF_PROPERTY = "Property";
    RDF_FIRST = "first";
    RDF_REST = "rest";
    RDF_NIL = "nil";
});

vocab!(RDFS = "http://www.w3.org/2000/01/rdf-schema#" {
    RDFS_CLASS = "Class";
    RDFS_LABEL = "label";
    RDFS_COMMENT = "comment";
    RDFS_SUB_CLASS_OF = "subClassOf";
    RDFS_SUB_PROPERTY_OF = "subPropertyOf";
    RDFS_DOMAIN = "domain";
    RDFS_RANGE = "range";
    RDFS_IS_DEFINED_BY = "isDefinedBy";
});

vocab!(OWL = "http://www.w3.org/2002/07/owl#" {
    OWL_ONTOLOGY = "Ontology";
    OWL_CLASS = "Class";
    OWL_RESTRICTION = "Restriction";
    OWL_OBJECT_PROPERTY = "ObjectProperty";
    OWL_DATATYPE_PROPERTY = "DatatypeProperty";
    OWL_ANNOTATION_PROPERTY = "AnnotationProperty";
    OWL_FUNCTIONAL_PROPERTY = "FunctionalProperty";
    OWL_INVERSE_FUNCTIONAL_PROPERTY = "InverseFunctionalProperty";
    OWL_NAMED_INDIVIDUAL = "NamedIndividual";
    OWL_VERSION_IRI = "versionIRI";
    OWL_VERSION_INFO = "versionInfo";
    OWL_PRIOR_VERSION = "priorVersion";
    OWL_EQUIVALENT_CLASS = "equivalentClass";
    OWL_ON_PROPERTY = "onProperty";
    OWL_ON_CLASS = "onClass";
    OWL_UNION_OF = "unionOf";
    OWL_INTERSECTION_OF = "intersectionOf";
    OWL_ALL_VALUES_FROM = "allValuesFrom";
    OWL_SOME_VALUES_FROM = "someValuesFrom";
    OWL_HAS_VALUE = "hasValue";
    OWL_CARDINALITY = "cardinality";
    OWL_QUALIFIED_CARDINALITY = "qualifiedCardinality";
    OWL_MIN_CARDINALITY = "minCardinality";
    OWL_MIN_QUALIFIED_CARDINALITY = "minQualifiedCardinality";
    OWL_MAX_CARDINALITY = "maxCardinality";
    OWL_MAX_QUALIFIED_CARDINALITY = "maxQualifiedCardinality";
});

vocab!(DC = "http://purl.org/dc/elements/1.1/" {
    DC_TITLE = "title";
    DC_DESCRIPTION = "description";
    DC_SOURCE = "source";
    DC_CREATOR = "creator";
    DC_CONTRIBUTOR = "contributor";
    DC_PUBLISHER = "publisher";
});

vocab!(DCTERMS = "http://purl.org/dc/terms/" {
    DCTERMS_TITLE = "title";
    DCTERMS_DESCRIPTION = "description";
    DCTERMS_SOURCE = "source";
    DCTERMS_LICENSE = "license";
    DCTERMS_CREATOR = "creator";
    DCTERMS_CONTRIBUTOR = "contributor";
    DCTERMS_PUBLISHER = "publisher";
    DCTERMS_CREATED = "created";
    DCTERMS_DATE_ACCEPTED = "dateAccepted";
    DCTERMS_MODIFIED = "modified";
    DCTERMS_ISSUED = "issued";
    DCTERMS_RIGHTS = "rights";
    DCTERMS_PROVENANCE = "provenance";
});

vocab!(SKOS = "http://www.w3.org/2004/02/skos/core#" {
    SKOS_CONCEPT_SCHEME = "ConceptScheme";
    SKOS_PREF_LABEL = "prefLabel";
    SKOS_DEFINITION = "definition";
    SKOS_EXAMPLE = "example";
    SKOS_SCOPE_NOTE = "scopeNote";
    SKOS_HISTORY_NOTE = "historyNote";
    SKOS_NOTE = "note";
});

vocab!(SDO = "https://schema.org/" {
    SDO_NAME = "name";
    SDO_DESCRIPTION = "description";
    SDO_LICENSE = "license";
    SDO_CREATOR = "creator";
    SDO_AUTHOR = "author";
    SDO_CONTRIBUTOR = "contributor";
    SDO_PUBLISHER = "publisher";
    SDO_CATEGORY = "category";
    SDO_IDENTIFIER = "identifier";
    SDO_DOMAIN_INCLUDES = "domainIncludes";
    SDO_RANGE_INCLUDES = "rangeIncludes";
    SDO_AFFILIATION = "affiliation";
    SDO_EMAIL = "email";
    SDO_HONORIFIC_PREFIX = "honorificPrefix";
    SDO_URL = "url";
    SDO_DEFINED_TERM_SET = "DefinedTermSet";
    SDO_DATE_CREATED = "dateCreated";
    SDO_DATE_MODIFIED = "dateModified";
    SDO_DATE_ISSUED = "dateIssued";
    SDO_COPYRIGHT_NOTICE = "copyrightNotice";
});

vocab!(VANN = "http://purl.org/vocab/vann/" {
    VANN_PREFERRED_NAMESPACE_PREFIX = "preferredNamespacePrefix";
    VANN_PREFERRED_NAMESPACE_URI = "preferredNamespaceUri";
});

vocab!(PROV = "http://www.w3.org/ns/prov#" {
    PROV_AGENT = "Agent";
});

vocab!(PROF = "http://www.w3.org/ns/dx/prof/" {
    PROF_PROFILE = "Profile";
});

vocab!(FOAF = "http://xmlns.com/foaf/0.1/" {
    FOAF_NAME = "name";
    FOAF_MBOX = "mbox";
});

vocab!(ORG = "http://www.w3.org/ns/org#" {
    ORG_MEMBER_OF = "memberOf";
});

vocab!(XSD = "http://www.w3.org/2001/XMLSchema#" {
    XSD_ANY_URI = "anyURI";
    XSD_STRING = "string";
});

// Documentation-only predicates produced by the inference pass. They unify
// alternative predicate spellings and record the inverses of the
// subclass/domain/range relations so each section renders from one
// predicate per concept.
vocab!(ONTDOC = "https://w3id.org/profile/ontdoc/" {
    ONTDOC_SUPER_CLASS_OF = "superClassOf";
    ONTDOC_SUPER_PROPERTY_OF = "superPropertyOf";
    ONTDOC_IN_DOMAIN_OF = "inDomainOf";
    ONTDOC_IN_DOMAIN_INCLUDES_OF = "inDomainIncludesOf";
    ONTDOC_IN_RANGE_OF = "inRangeOf";
    ONTDOC_IN_RANGE_INCLUDES_OF = "inRangeIncludesOf";
    ONTDOC_HAS_MEMBER = "hasMember";
    ONTDOC_HAS_INSTANCE = "hasInstance";
    ONTDOC_RESTRICTION = "restriction";
});

// Internal marker IRIs for the fixed page sections (metadata, namespace
// listing, legend). Only ever used as fragment-registry keys.
vocab!(ONTOD = "https://w3id.org/ontod#" {
    ONTOD_METADATA = "Metadata";
    ONTOD_NAMESPACES = "Namespaces";
    ONTOD_LEGEND = "Legend";
});

/// Metadata properties rendered for the ontology itself, in display order.
pub const ONT_PROPS: &[&str] = &[
    DCTERMS_TITLE,
    DCTERMS_PUBLISHER,
    DCTERMS_CREATOR,
    DCTERMS_CONTRIBUTOR,
    DCTERMS_CREATED,
    DCTERMS_DATE_ACCEPTED,
    DCTERMS_MODIFIED,
    DCTERMS_ISSUED,
    DCTERMS_LICENSE,
    DCTERMS_RIGHTS,
    SDO_CATEGORY,
    OWL_VERSION_IRI,
    OWL_VERSION_INFO,
    OWL_PRIOR_VERSION,
    SDO_IDENTIFIER,
    VANN_PREFERRED_NAMESPACE_PREFIX,
    VANN_PREFERRED_NAMESPACE_URI,
    SKOS_HISTORY_NOTE,
    SKOS_SCOPE_NOTE,
    DCTERMS_SOURCE,
    DCTERMS_PROVENANCE,
    SKOS_NOTE,
    DCTERMS_DESCRIPTION,
    ONTDOC_RESTRICTION,
];

/// Properties rendered for class definienda, in display order.
pub const CLASS_PROPS: &[&str] = &[
    RDFS_IS_DEFINED_BY,
    DCTERMS_TITLE,
    DCTERMS_DESCRIPTION,
    SKOS_SCOPE_NOTE,
    SKOS_EXAMPLE,
    DCTERMS_SOURCE,
    DCTERMS_PROVENANCE,
    SKOS_NOTE,
    RDFS_SUB_CLASS_OF,
    OWL_EQUIVALENT_CLASS,
    ONTDOC_IN_DOMAIN_OF,
    ONTDOC_IN_DOMAIN_INCLUDES_OF,
    ONTDOC_IN_RANGE_OF,
    ONTDOC_IN_RANGE_INCLUDES_OF,
    ONTDOC_RESTRICTION,
    ONTDOC_HAS_INSTANCE,
    ONTDOC_SUPER_CLASS_OF,
];

/// Properties rendered for property definienda (all OWL property kinds).
pub const PROP_PROPS: &[&str] = &[
    RDFS_IS_DEFINED_BY,
    DCTERMS_TITLE,
    DCTERMS_DESCRIPTION,
    SKOS_SCOPE_NOTE,
    SKOS_EXAMPLE,
    DCTERMS_SOURCE,
    DCTERMS_PROVENANCE,
    SKOS_NOTE,
    RDFS_SUB_PROPERTY_OF,
    ONTDOC_SUPER_PROPERTY_OF,
    RDFS_DOMAIN,
    SDO_DOMAIN_INCLUDES,
    RDFS_RANGE,
    SDO_RANGE_INCLUDES,
];

/// Properties recognized on agents (creators, contributors, publishers).
pub const AGENT_PROPS: &[&str] = &[
    SDO_NAME,
    SDO_AFFILIATION,
    SDO_IDENTIFIER,
    SDO_EMAIL,
    SDO_HONORIFIC_PREFIX,
    SDO_URL,
];

/// Predicates recognized inside `owl:Restriction` blank nodes.
pub const RESTRICTION_PROPS: &[&str] = &[
    OWL_ALL_VALUES_FROM,
    OWL_SOME_VALUES_FROM,
    OWL_HAS_VALUE,
    OWL_ON_PROPERTY,
    OWL_ON_CLASS,
    OWL_CARDINALITY,
    OWL_QUALIFIED_CARDINALITY,
    OWL_MIN_CARDINALITY,
    OWL_MIN_QUALIFIED_CARDINALITY,
    OWL_MAX_CARDINALITY,
    OWL_MAX_QUALIFIED_CARDINALITY,
];

/// Cardinality-bearing predicates inside restrictions.
pub const RESTRICTION_TYPES: &[&str] = &[
    OWL_CARDINALITY,
    OWL_QUALIFIED_CARDINALITY,
    OWL_MIN_CARDINALITY,
    OWL_MIN_QUALIFIED_CARDINALITY,
    OWL_MAX_CARDINALITY,
    OWL_MAX_QUALIFIED_CARDINALITY,
    OWL_ALL_VALUES_FROM,
    OWL_SOME_VALUES_FROM,
    OWL_HAS_VALUE,
];

/// Set-class predicates.
pub const OWL_SET_TYPES: &[&str] = &[OWL_UNION_OF, OWL_INTERSECTION_OF];

/// The numeric cardinality predicates.
pub const NUMERIC_CARDINALITIES: &[&str] = &[
    OWL_MIN_CARDINALITY,
    OWL_MIN_QUALIFIED_CARDINALITY,
    OWL_MAX_CARDINALITY,
    OWL_MAX_QUALIFIED_CARDINALITY,
    OWL_CARDINALITY,
    OWL_QUALIFIED_CARDINALITY,
];

/// Every predicate the meta-ontology loader prepares display data for.
pub fn all_known_props() -> impl Iterator<Item = &'static str> {
    ONT_PROPS
        .iter()
        .chain(CLASS_PROPS)
        .chain(PROP_PROPS)
        .chain(AGENT_PROPS)
        .chain(RESTRICTION_PROPS)
        .copied()
}

/// Namespace bindings available to every parsed graph, mirroring the core
/// bindings the well-known vocabularies use.
pub const CORE_BINDINGS: &[(&str, &str)] = &[
    ("rdf", RDF),
    ("rdfs", RDFS),
    ("owl", OWL),
    ("xsd", XSD),
    ("dc", DC),
    ("dcterms", DCTERMS),
    ("skos", SKOS),
    ("sdo", SDO),
    ("vann", VANN),
    ("prov", PROV),
    ("prof", PROF),
    ("foaf", FOAF),
    ("org", ORG),
    ("ontdoc", ONTDOC),
];

/// Classification of definienda into documentation sections.
///
/// The variant order is the order sections appear in the rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexedProperty {
    Class,
    Property,
    ObjectProperty,
    DatatypeProperty,
    AnnotationProperty,
    FunctionalProperty,
    InverseFunctionalProperty,
    NamedIndividual,
}

impl IndexedProperty {
    /// All kinds in section order.
    pub const ALL: [IndexedProperty; 8] = [
        IndexedProperty::Class,
        IndexedProperty::Property,
        IndexedProperty::ObjectProperty,
        IndexedProperty::DatatypeProperty,
        IndexedProperty::AnnotationProperty,
        IndexedProperty::FunctionalProperty,
        IndexedProperty::InverseFunctionalProperty,
        IndexedProperty::NamedIndividual,
    ];

    /// The `rdf:type` object identifying members of this kind.
    pub fn iri(self) -> &'static str {
        match self {
            IndexedProperty::Class => OWL_CLASS,
            IndexedProperty::Property => RDF_PROPERTY,
            IndexedProperty::ObjectProperty => OWL_OBJECT_PROPERTY,
            IndexedProperty::DatatypeProperty => OWL_DATATYPE_PROPERTY,
            IndexedProperty::AnnotationProperty => OWL_ANNOTATION_PROPERTY,
            IndexedProperty::FunctionalProperty => OWL_FUNCTIONAL_PROPERTY,
            IndexedProperty::InverseFunctionalProperty => OWL_INVERSE_FUNCTIONAL_PROPERTY,
            IndexedProperty::NamedIndividual => OWL_NAMED_INDIVIDUAL,
        }
    }

    /// Superscript abbreviation shown next to definienda of this kind.
    pub fn abbrev(self) -> &'static str {
        match self {
            IndexedProperty::Class => "c",
            IndexedProperty::Property => "p",
            IndexedProperty::ObjectProperty => "op",
            IndexedProperty::DatatypeProperty => "dp",
            IndexedProperty::AnnotationProperty => "ap",
            IndexedProperty::FunctionalProperty => "fp",
            IndexedProperty::InverseFunctionalProperty => "ifp",
            IndexedProperty::NamedIndividual => "ni",
        }
    }

    /// Singular title, used in tooltips and the legend.
    pub fn inline_title(self) -> &'static str {
        match self {
            IndexedProperty::Class => "OWL/RDFS Class",
            IndexedProperty::Property => "RDF Property",
            IndexedProperty::ObjectProperty => "OWL Object Property",
            IndexedProperty::DatatypeProperty => "OWL Datatype Property",
            IndexedProperty::AnnotationProperty => "OWL Annotation Property",
            IndexedProperty::FunctionalProperty => "OWL Functional Property",
            IndexedProperty::InverseFunctionalProperty => "OWL Inverse Functional Property",
            IndexedProperty::NamedIndividual => "OWL Named Individual",
        }
    }

    /// Plural title, used as the section heading.
    pub fn plural_title(self) -> &'static str {
        match self {
            IndexedProperty::Class => "Classes",
            IndexedProperty::Property => "Properties",
            IndexedProperty::ObjectProperty => "Object Properties",
            IndexedProperty::DatatypeProperty => "Datatype Properties",
            IndexedProperty::AnnotationProperty => "Annotation Properties",
            IndexedProperty::FunctionalProperty => "Functional Properties",
            IndexedProperty::InverseFunctionalProperty => "Inverse Functional Properties",
            IndexedProperty::NamedIndividual => "Named Individuals",
        }
    }

    /// Subtypes whose members must not additionally be listed under this
    /// kind. Keeps a subject typed both `rdf:Property` and
    /// `owl:ObjectProperty` out of the generic Properties section.
    pub fn specializations(self) -> &'static [&'static str] {
        match self {
            IndexedProperty::Property => &[
                OWL_OBJECT_PROPERTY,
                OWL_DATATYPE_PROPERTY,
                OWL_ANNOTATION_PROPERTY,
                OWL_FUNCTIONAL_PROPERTY,
                OWL_INVERSE_FUNCTIONAL_PROPERTY,
            ],
            _ => &[],
        }
    }

    /// Predicates whose values are rendered for definienda of this kind.
    pub fn properties(self) -> &'static [&'static str] {
        match self {
            IndexedProperty::Class => CLASS_PROPS,
            _ => PROP_PROPS,
        }
    }
}
