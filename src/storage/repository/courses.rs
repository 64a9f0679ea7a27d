// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Course repository.
//!
//! Every mutation of an existing course (field edits, roster changes,
//! deletion) runs its guard and its write inside one redb write transaction.
//! Enrolling is therefore an atomic set-insert and dropping an atomic
//! set-remove: two concurrent enrollments cannot overwrite each other.

use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::super::database::{CourseDatabase, StoreError, StoreResult, COURSES};

/// Course stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct StoredCourse {
    /// Unique course identifier (UUID)
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    /// Owning instructor's user ID. Set at creation, never reassigned.
    pub instructor: String,
    /// Enrolled student IDs, without duplicates
    #[serde(default)]
    pub students: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl StoredCourse {
    /// New course with an empty roster.
    pub fn new(
        instructor: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            price,
            instructor: instructor.into(),
            students: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn has_student(&self, user_id: &str) -> bool {
        self.students.iter().any(|s| s == user_id)
    }

    /// Insert into the roster. Returns `false` if already present.
    pub fn add_student(&mut self, user_id: &str) -> bool {
        if self.has_student(user_id) {
            return false;
        }
        self.students.push(user_id.to_string());
        true
    }

    /// Remove from the roster. Returns `false` if not present.
    pub fn remove_student(&mut self, user_id: &str) -> bool {
        let before = self.students.len();
        self.students.retain(|s| s != user_id);
        self.students.len() != before
    }
}

impl crate::policy::OwnedResource for StoredCourse {
    fn owner_user_id(&self) -> &str {
        &self.instructor
    }
}

/// Read-side selection of courses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseFilter<'f> {
    All,
    Instructor(&'f str),
    Student(&'f str),
    Title(&'f str),
}

impl CourseFilter<'_> {
    pub fn matches(&self, course: &StoredCourse) -> bool {
        match self {
            CourseFilter::All => true,
            CourseFilter::Instructor(id) => course.instructor == *id,
            CourseFilter::Student(id) => course.has_student(id),
            CourseFilter::Title(title) => course.title == *title,
        }
    }
}

/// Repository for course operations.
pub struct CourseRepository<'a> {
    db: &'a CourseDatabase,
}

impl<'a> CourseRepository<'a> {
    pub fn new(db: &'a CourseDatabase) -> Self {
        Self { db }
    }

    /// Insert a new course.
    pub fn create(&self, course: &StoredCourse) -> StoreResult<()> {
        let json = serde_json::to_vec(course)?;

        let write_txn = self.db.inner().begin_write()?;
        {
            let mut table = write_txn.open_table(COURSES)?;
            if table.get(course.id.as_str())?.is_some() {
                return Err(StoreError::AlreadyExists(format!("Course {}", course.id)));
            }
            table.insert(course.id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get a course by ID.
    pub fn get(&self, course_id: &str) -> StoreResult<Option<StoredCourse>> {
        let read_txn = self.db.inner().begin_read()?;
        let table = read_txn.open_table(COURSES)?;
        match table.get(course_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// List courses matching a filter, oldest first.
    pub fn list(&self, filter: CourseFilter<'_>) -> StoreResult<Vec<StoredCourse>> {
        let read_txn = self.db.inner().begin_read()?;
        let table = read_txn.open_table(COURSES)?;

        let mut courses = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let course: StoredCourse = serde_json::from_slice(value.value())?;
            if filter.matches(&course) {
                courses.push(course);
            }
        }

        courses.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(courses)
    }

    /// Atomically read, modify and write back one course.
    ///
    /// `apply` runs inside the write transaction against the current stored
    /// value. If it fails nothing is written. The course is only rewritten if
    /// `apply` actually changed it. The `id`, `instructor` and `created_at`
    /// fields are restored after `apply` so they stay immutable.
    pub fn modify<T, E, F>(&self, course_id: &str, apply: F) -> Result<(T, StoredCourse), E>
    where
        F: FnOnce(&mut StoredCourse) -> Result<T, E>,
        E: From<StoreError>,
    {
        let write_txn = self.db.inner().begin_write().map_err(StoreError::from)?;
        let result = {
            let mut table = write_txn.open_table(COURSES).map_err(StoreError::from)?;

            // Copy the bytes out before mutating the table
            let existing = {
                let value = table
                    .get(course_id)
                    .map_err(StoreError::from)?
                    .ok_or_else(|| StoreError::NotFound(format!("Course {course_id}")))?;
                value.value().to_vec()
            };

            let stored: StoredCourse =
                serde_json::from_slice(&existing).map_err(StoreError::from)?;
            let mut course = stored.clone();
            let outcome = apply(&mut course)?;

            course.id = stored.id.clone();
            course.instructor = stored.instructor.clone();
            course.created_at = stored.created_at;

            if course != stored {
                let json = serde_json::to_vec(&course).map_err(StoreError::from)?;
                table
                    .insert(course_id, json.as_slice())
                    .map_err(StoreError::from)?;
            }
            (outcome, course)
        };
        write_txn.commit().map_err(StoreError::from)?;
        Ok(result)
    }

    /// Atomically check and delete one course, returning the removed snapshot.
    pub fn delete_if<E, F>(&self, course_id: &str, guard: F) -> Result<StoredCourse, E>
    where
        F: FnOnce(&StoredCourse) -> Result<(), E>,
        E: From<StoreError>,
    {
        let write_txn = self.db.inner().begin_write().map_err(StoreError::from)?;
        let course = {
            let mut table = write_txn.open_table(COURSES).map_err(StoreError::from)?;

            let existing = {
                let value = table
                    .get(course_id)
                    .map_err(StoreError::from)?
                    .ok_or_else(|| StoreError::NotFound(format!("Course {course_id}")))?;
                value.value().to_vec()
            };

            let course: StoredCourse =
                serde_json::from_slice(&existing).map_err(StoreError::from)?;
            guard(&course)?;

            table.remove(course_id).map_err(StoreError::from)?;
            course
        };
        write_txn.commit().map_err(StoreError::from)?;
        Ok(course)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_db() -> (CourseDatabase, TempDir) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db = CourseDatabase::open(&dir.path().join("courses.redb")).expect("Failed to open db");
        (db, dir)
    }

    fn test_course(instructor: &str, title: &str) -> StoredCourse {
        StoredCourse::new(instructor, title, "An introductory course", 100.0)
    }

    #[test]
    fn roster_is_a_set() {
        let mut course = test_course("inst-1", "Rust 101");
        assert!(course.add_student("s1"));
        assert!(!course.add_student("s1"));
        assert_eq!(course.students, vec!["s1".to_string()]);

        assert!(course.remove_student("s1"));
        assert!(!course.remove_student("s1"));
        assert!(course.students.is_empty());
    }

    #[test]
    fn create_and_get_course() {
        let (db, _dir) = test_db();
        let repo = CourseRepository::new(&db);

        let course = test_course("inst-1", "Rust 101");
        repo.create(&course).unwrap();

        let loaded = repo.get(&course.id).unwrap().expect("course exists");
        assert_eq!(loaded, course);
        assert!(repo.get("missing").unwrap().is_none());

        let dup = repo.create(&course);
        assert!(matches!(dup, Err(StoreError::AlreadyExists(_))));
    }

    #[test]
    fn list_applies_filters() {
        let (db, _dir) = test_db();
        let repo = CourseRepository::new(&db);

        let mut first = test_course("inst-1", "Rust 101");
        first.add_student("s1");
        repo.create(&first).unwrap();
        repo.create(&test_course("inst-1", "Rust 201")).unwrap();
        repo.create(&test_course("inst-2", "Rust 101")).unwrap();

        assert_eq!(repo.list(CourseFilter::All).unwrap().len(), 3);
        assert_eq!(repo.list(CourseFilter::Instructor("inst-1")).unwrap().len(), 2);
        assert_eq!(repo.list(CourseFilter::Title("Rust 101")).unwrap().len(), 2);
        let enrolled = repo.list(CourseFilter::Student("s1")).unwrap();
        assert_eq!(enrolled, vec![first]);
        assert!(repo.list(CourseFilter::Student("nobody")).unwrap().is_empty());
    }

    #[test]
    fn modify_writes_changes_and_keeps_identity_fields() {
        let (db, _dir) = test_db();
        let repo = CourseRepository::new(&db);
        let course = test_course("inst-1", "Rust 101");
        repo.create(&course).unwrap();

        let (added, updated) = repo
            .modify::<_, StoreError, _>(&course.id, |c| {
                c.instructor = "someone-else".to_string();
                c.title = "Rust 102".to_string();
                Ok(c.add_student("s1"))
            })
            .unwrap();

        assert!(added);
        assert_eq!(updated.instructor, "inst-1");
        assert_eq!(updated.title, "Rust 102");

        let stored = repo.get(&course.id).unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[test]
    fn modify_failure_writes_nothing() {
        let (db, _dir) = test_db();
        let repo = CourseRepository::new(&db);
        let course = test_course("inst-1", "Rust 101");
        repo.create(&course).unwrap();

        let result = repo.modify::<(), StoreError, _>(&course.id, |c| {
            c.title = "changed".to_string();
            Err(StoreError::NotFound("guard".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(repo.get(&course.id).unwrap().unwrap().title, "Rust 101");
    }

    #[test]
    fn modify_and_delete_report_missing_course() {
        let (db, _dir) = test_db();
        let repo = CourseRepository::new(&db);

        let result = repo.modify::<(), StoreError, _>("missing", |_| Ok(()));
        assert!(matches!(result, Err(StoreError::NotFound(_))));

        let result = repo.delete_if::<StoreError, _>("missing", |_| Ok(()));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn delete_if_respects_guard() {
        let (db, _dir) = test_db();
        let repo = CourseRepository::new(&db);
        let course = test_course("inst-1", "Rust 101");
        repo.create(&course).unwrap();

        let refused = repo.delete_if::<StoreError, _>(&course.id, |_| {
            Err(StoreError::AlreadyExists("guard".to_string()))
        });
        assert!(refused.is_err());
        assert!(repo.get(&course.id).unwrap().is_some());

        let removed = repo.delete_if::<StoreError, _>(&course.id, |_| Ok(())).unwrap();
        assert_eq!(removed, course);
        assert!(repo.get(&course.id).unwrap().is_none());
    }

    #[test]
    fn concurrent_enrollments_are_not_lost() {
        let (db, _dir) = test_db();
        let db = Arc::new(db);
        let course = test_course("inst-1", "Rust 101");
        CourseRepository::new(&db).create(&course).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let db = Arc::clone(&db);
                let course_id = course.id.clone();
                std::thread::spawn(move || {
                    CourseRepository::new(&db)
                        .modify::<_, StoreError, _>(&course_id, |c| Ok(c.add_student(&format!("s{i}"))))
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stored = CourseRepository::new(&db).get(&course.id).unwrap().unwrap();
        assert_eq!(stored.students.len(), 8);
    }
}
