use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{CourseId, ModuleId};
use crate::model::question::Question;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course name cannot be empty")]
    EmptyName,

    #[error("module name cannot be empty")]
    EmptyModuleName,

    #[error("module {0} appears twice in the course")]
    DuplicateModule(ModuleId),
}

/// A unit of course content with an optional quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    id: ModuleId,
    name: String,
    content: String,
    #[serde(default)]
    quiz: Vec<Question>,
}

impl Module {
    /// # Errors
    ///
    /// Returns `CourseError::EmptyModuleName` if the name is blank.
    pub fn new(
        id: ModuleId,
        name: impl Into<String>,
        content: impl Into<String>,
        quiz: Vec<Question>,
    ) -> Result<Self, CourseError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CourseError::EmptyModuleName);
        }
        Ok(Self {
            id,
            name,
            content: content.into(),
            quiz,
        })
    }

    /// Returns the module id, unique within its course.
    #[must_use]
    pub fn id(&self) -> ModuleId {
        self.id
    }

    /// Returns the module name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the module body text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the quiz questions in order; empty when the module has no quiz.
    #[must_use]
    pub fn quiz(&self) -> &[Question] {
        &self.quiz
    }

    /// First `max_chars` characters of the content, for module list previews.
    #[must_use]
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.content.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.content[..idx],
            None => &self.content,
        }
    }
}

/// A named course owning an ordered list of modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    id: CourseId,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    modules: Vec<Module>,
}

impl Course {
    /// Create a course with no modules. Name and description are trimmed.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyName` if the trimmed name is empty.
    pub fn new(
        id: CourseId,
        name: impl AsRef<str>,
        description: impl AsRef<str>,
    ) -> Result<Self, CourseError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(CourseError::EmptyName);
        }
        Ok(Self {
            id,
            name: name.to_owned(),
            description: description.as_ref().trim().to_owned(),
            modules: Vec::new(),
        })
    }

    /// Attach modules, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::DuplicateModule` if two modules share an id.
    pub fn with_modules(mut self, modules: Vec<Module>) -> Result<Self, CourseError> {
        for (idx, module) in modules.iter().enumerate() {
            if modules[..idx].iter().any(|m| m.id == module.id) {
                return Err(CourseError::DuplicateModule(module.id));
            }
        }
        self.modules = modules;
        Ok(self)
    }

    /// Returns the course id.
    #[must_use]
    pub fn id(&self) -> CourseId {
        self.id
    }

    /// Returns the trimmed course name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the trimmed description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the modules in catalog order.
    #[must_use]
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Returns how many modules the course has.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Looks up a module by id.
    #[must_use]
    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(id: u64) -> Module {
        Module::new(ModuleId::new(id), format!("M{id}"), "text", Vec::new()).unwrap()
    }

    #[test]
    fn new_course_trims_and_requires_name() {
        let course = Course::new(CourseId::new(1), "  Physics ", " waves ").unwrap();
        assert_eq!(course.name(), "Physics");
        assert_eq!(course.description(), "waves");
        assert_eq!(course.module_count(), 0);

        let err = Course::new(CourseId::new(2), "   ", "x").unwrap_err();
        assert_eq!(err, CourseError::EmptyName);
    }

    #[test]
    fn duplicate_module_ids_are_rejected() {
        let err = Course::new(CourseId::new(1), "C", "")
            .unwrap()
            .with_modules(vec![module(1), module(2), module(1)])
            .unwrap_err();
        assert_eq!(err, CourseError::DuplicateModule(ModuleId::new(1)));
    }

    #[test]
    fn module_lookup_by_id() {
        let course = Course::new(CourseId::new(1), "C", "")
            .unwrap()
            .with_modules(vec![module(1), module(2)])
            .unwrap();
        assert_eq!(course.module(ModuleId::new(2)).unwrap().name(), "M2");
        assert!(course.module(ModuleId::new(3)).is_none());
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let m = Module::new(ModuleId::new(1), "M", "héllo wörld", Vec::new()).unwrap();
        assert_eq!(m.preview(4), "héll");
        assert_eq!(m.preview(100), "héllo wörld");
    }
}
