//! Controlled vocabularies offered by the editor

/// Resource type preselected for new records
pub const DEFAULT_RESOURCE_TYPE: &str = "Dataset";

/// Top-level resource types
pub const RESOURCE_TYPES: &[&str] = &[
    "Dataset",
    "Event",
    "Image",
    "Lesson",
    "Model",
    "Other",
    "Physical object",
    "Poster",
    "Presentation",
    "Publication",
    "Software",
    "Video/Audio",
    "Workflow",
];

pub const IMAGE_SUBTYPES: &[&str] = &["Diagram", "Drawing", "Figure", "Other", "Photo", "Plot"];

pub const PUBLICATION_SUBTYPES: &[&str] = &[
    "Annotation collection",
    "Book",
    "Book chapter",
    "Conference paper",
    "Conference proceeding",
    "Data paper",
    "Dissertation",
    "Journal",
    "Journal article",
    "Other",
    "Output management plan",
    "Patent",
    "Peer review",
    "Preprint",
    "Project deliverable",
    "Project milestone",
    "Proposal",
    "Report",
    "Software documentation",
    "Standard",
    "Taxonomic treatment",
    "Technical note",
    "Thesis",
    "Working paper",
];

pub const SOFTWARE_SUBTYPES: &[&str] = &["Computational notebook"];

pub const TITLE_TYPES: &[&str] = &["main", "alternative", "subtitle", "translated", "other"];

/// ISO 639-3 codes offered in the language pickers
pub const LANGUAGES: &[&str] = &[
    "eng", "fra", "deu", "spa", "ita", "por", "rus", "chi", "jpn", "ara", "hin",
];

pub const THESIS_TYPES: &[&str] = &["Masters", "PhD", "Bachelor", "Diploma", "Other"];

fn subtypes_of(resource_type: &str) -> &'static [&'static str] {
    match resource_type {
        "Image" => IMAGE_SUBTYPES,
        "Publication" => PUBLICATION_SUBTYPES,
        "Software" => SOFTWARE_SUBTYPES,
        _ => &[],
    }
}

/// Every selectable resource type, each top-level type followed by its
/// `"Type: Subtype"` entries
pub fn resource_type_options() -> Vec<String> {
    let mut options = Vec::new();
    for resource_type in RESOURCE_TYPES {
        options.push(resource_type.to_string());
        for subtype in subtypes_of(resource_type) {
            options.push(format!("{}: {}", resource_type, subtype));
        }
    }
    options
}

/// Check a value against [`resource_type_options`]
pub fn is_known_resource_type(value: &str) -> bool {
    match value.split_once(": ") {
        Some((parent, subtype)) => {
            RESOURCE_TYPES.contains(&parent) && subtypes_of(parent).contains(&subtype)
        }
        None => RESOURCE_TYPES.contains(&value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_options_order() {
        let options = resource_type_options();
        assert_eq!(options[0], "Dataset");
        let image = options.iter().position(|o| o == "Image").unwrap();
        assert_eq!(options[image + 1], "Image: Diagram");
        assert_eq!(
            options.len(),
            RESOURCE_TYPES.len()
                + IMAGE_SUBTYPES.len()
                + PUBLICATION_SUBTYPES.len()
                + SOFTWARE_SUBTYPES.len()
        );
    }

    #[test]
    fn test_known_resource_types() {
        assert!(is_known_resource_type("Dataset"));
        assert!(is_known_resource_type("Publication: Journal article"));
        assert!(is_known_resource_type("Software: Computational notebook"));
        assert!(!is_known_resource_type("Dataset: Table"));
        assert!(!is_known_resource_type("Spreadsheet"));
    }
}
