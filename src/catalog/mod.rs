//! Course catalog and per-course question schemas

pub mod courses;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Stable course identifier
///
/// Display titles are never used as keys. Host catalogs may introduce ids
/// that have no built-in variant; those land in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CourseId {
    DigitalMarketing,
    VideoProduction,
    GraphicDesign,
    WebDevelopmentNative,
    WebDevelopmentFullStack,
    MobileDevelopment,
    AlgorithmicBasics,
    PythonBasic,
    VideoEditing,
    Other(String),
}

impl CourseId {
    pub fn builtin() -> &'static [CourseId] {
        &[
            CourseId::DigitalMarketing,
            CourseId::VideoProduction,
            CourseId::GraphicDesign,
            CourseId::WebDevelopmentNative,
            CourseId::WebDevelopmentFullStack,
            CourseId::MobileDevelopment,
            CourseId::AlgorithmicBasics,
            CourseId::PythonBasic,
            CourseId::VideoEditing,
        ]
    }

    pub fn as_str(&self) -> &str {
        match self {
            CourseId::DigitalMarketing => "digital-marketing",
            CourseId::VideoProduction => "video-production",
            CourseId::GraphicDesign => "graphic-design",
            CourseId::WebDevelopmentNative => "web-development-native",
            CourseId::WebDevelopmentFullStack => "web-development-full-stack",
            CourseId::MobileDevelopment => "mobile-development",
            CourseId::AlgorithmicBasics => "algorithmic-basics",
            CourseId::PythonBasic => "python-basic",
            CourseId::VideoEditing => "video-editing",
            CourseId::Other(id) => id,
        }
    }

    /// Parse a slug or a display title ("Python Basic" and "python-basic"
    /// both resolve to `PythonBasic`)
    pub fn parse(s: &str) -> Self {
        let slug = slugify(s);
        Self::builtin()
            .iter()
            .find(|id| id.as_str() == slug)
            .cloned()
            .unwrap_or_else(|| CourseId::Other(s.trim().to_string()))
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for CourseId {
    fn from(s: String) -> Self {
        CourseId::parse(&s)
    }
}

impl From<CourseId> for String {
    fn from(id: CourseId) -> Self {
        id.as_str().to_string()
    }
}

fn slugify(s: &str) -> String {
    s.trim()
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// A course as listed on the landing screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Hex color used for the course badge
    #[serde(default = "default_accent")]
    pub accent: String,
}

fn default_accent() -> String {
    "#667eea".to_string()
}

impl Course {
    /// Stand-in for an id the catalog does not list
    pub fn placeholder(id: CourseId) -> Self {
        Self {
            title: id.as_str().to_string(),
            id,
            description: String::new(),
            accent: default_accent(),
        }
    }
}

/// One course-specific multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub key: String,
    pub prompt: String,
    pub options: Vec<String>,
}

impl Question {
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("course '{0}' is listed more than once")]
    DuplicateCourse(String),
    #[error("course '{course}' repeats question key '{key}'")]
    DuplicateQuestion { course: String, key: String },
    #[error("question '{key}' of course '{course}' has no options")]
    EmptyOptions { course: String, key: String },
    #[error("question '{key}' of course '{course}' repeats option '{option}'")]
    DuplicateOption {
        course: String,
        key: String,
        option: String,
    },
}

/// Catalog file entry: a course plus its question schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseEntry {
    #[serde(flatten)]
    pub course: Course,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CatalogFile {
    courses: Vec<CourseEntry>,
}

/// Ordered course list with a schema table keyed by `CourseId`
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: Vec<Course>,
    schemas: HashMap<CourseId, Vec<Question>>,
}

impl Catalog {
    /// Build a catalog, checking the question invariants
    pub fn new(entries: Vec<CourseEntry>) -> Result<Self, CatalogError> {
        let mut catalog = Catalog::default();
        for entry in entries {
            let course_id = entry.course.id.clone();
            if catalog.schemas.contains_key(&course_id) {
                return Err(CatalogError::DuplicateCourse(course_id.to_string()));
            }
            validate_schema(&course_id, &entry.questions)?;
            catalog.schemas.insert(course_id, entry.questions);
            catalog.courses.push(entry.course);
        }
        Ok(catalog)
    }

    /// The nine courses from the training center's landing page
    pub fn builtin() -> Self {
        // Checked by test_builtin_catalog
        Self::new(courses::builtin_entries()).unwrap_or_default()
    }

    pub fn from_yaml(contents: &str) -> anyhow::Result<Self> {
        let file: CatalogFile = serde_yaml_ng::from_str(contents)?;
        Ok(Self::new(file.courses)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn find(&self, id: &CourseId) -> Option<&Course> {
        self.courses.iter().find(|c| &c.id == id)
    }

    /// Questions for a course. Unknown ids get an empty schema, so every
    /// course yields a usable wizard.
    pub fn schema_for(&self, id: &CourseId) -> &[Question] {
        self.schemas.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn validate_schema(course: &CourseId, questions: &[Question]) -> Result<(), CatalogError> {
    let mut keys = HashSet::new();
    for question in questions {
        if !keys.insert(question.key.as_str()) {
            return Err(CatalogError::DuplicateQuestion {
                course: course.to_string(),
                key: question.key.clone(),
            });
        }
        if question.options.is_empty() {
            return Err(CatalogError::EmptyOptions {
                course: course.to_string(),
                key: question.key.clone(),
            });
        }
        let mut seen = HashSet::new();
        for option in &question.options {
            if !seen.insert(option.as_str()) {
                return Err(CatalogError::DuplicateOption {
                    course: course.to_string(),
                    key: question.key.clone(),
                    option: option.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_id_parse_title_and_slug() {
        assert_eq!(CourseId::parse("Python Basic"), CourseId::PythonBasic);
        assert_eq!(CourseId::parse("python-basic"), CourseId::PythonBasic);
        assert_eq!(
            CourseId::parse("Web Development Full Stack"),
            CourseId::WebDevelopmentFullStack
        );
        assert_eq!(
            CourseId::parse("Quantum Computing"),
            CourseId::Other("Quantum Computing".to_string())
        );
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 9);
        for id in CourseId::builtin() {
            assert!(catalog.find(id).is_some(), "missing course {}", id);
            assert_eq!(catalog.schema_for(id).len(), 3);
        }
    }

    #[test]
    fn test_schema_for_unknown_course_is_empty() {
        let catalog = Catalog::builtin();
        let id = CourseId::parse("Quantum Computing");
        assert!(catalog.schema_for(&id).is_empty());
        assert!(catalog.find(&id).is_none());
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r##"
courses:
  - id: python-basic
    title: Python Basic
    questions:
      - key: experience
        prompt: Have you programmed before?
        options: [Never, A little]
  - id: rust-intro
    title: Rust Intro
    accent: "#ff7043"
"##;
        let catalog = Catalog::from_yaml(yaml).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.schema_for(&CourseId::PythonBasic).len(), 1);

        let rust = CourseId::Other("rust-intro".to_string());
        assert_eq!(catalog.find(&rust).unwrap().accent, "#ff7043");
        assert!(catalog.schema_for(&rust).is_empty());
    }

    #[test]
    fn test_rejects_duplicate_question_key() {
        let question = Question {
            key: "goals".to_string(),
            prompt: "Why?".to_string(),
            options: vec!["A".to_string()],
        };
        let entry = CourseEntry {
            course: Course::placeholder(CourseId::PythonBasic),
            questions: vec![question.clone(), question],
        };
        assert_eq!(
            Catalog::new(vec![entry]).unwrap_err(),
            CatalogError::DuplicateQuestion {
                course: "python-basic".to_string(),
                key: "goals".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_empty_and_duplicate_options() {
        let empty = CourseEntry {
            course: Course::placeholder(CourseId::GraphicDesign),
            questions: vec![Question {
                key: "goals".to_string(),
                prompt: "Why?".to_string(),
                options: vec![],
            }],
        };
        assert!(matches!(
            Catalog::new(vec![empty]),
            Err(CatalogError::EmptyOptions { .. })
        ));

        let repeated = CourseEntry {
            course: Course::placeholder(CourseId::GraphicDesign),
            questions: vec![Question {
                key: "goals".to_string(),
                prompt: "Why?".to_string(),
                options: vec!["A".to_string(), "A".to_string()],
            }],
        };
        assert!(matches!(
            Catalog::new(vec![repeated]),
            Err(CatalogError::DuplicateOption { .. })
        ));
    }

    #[test]
    fn test_rejects_duplicate_course() {
        let entry = CourseEntry {
            course: Course::placeholder(CourseId::VideoEditing),
            questions: vec![],
        };
        assert_eq!(
            Catalog::new(vec![entry.clone(), entry]).unwrap_err(),
            CatalogError::DuplicateCourse("video-editing".to_string())
        );
    }
}
