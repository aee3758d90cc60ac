//! Teacher lookups.

use crate::database::models::Teacher;
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::teacher_repository::TeacherRepository;

pub struct TeacherService<'a> {
    teachers: &'a TeacherRepository<'a>,
}

impl<'a> TeacherService<'a> {
    pub fn new(teachers: &'a TeacherRepository<'a>) -> Self {
        Self { teachers }
    }

    pub async fn find_by_id(&self, id: i64) -> ServiceResult<Teacher> {
        self.teachers
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Teacher", id))
    }

    pub async fn find_all(&self) -> ServiceResult<Vec<Teacher>> {
        Ok(self.teachers.find_all().await?)
    }
}
