//! # Geography Service
//!
//! Departments and the cities inside them.

use tracing::info;

use commerce_core::dto::{CityDto, DepartmentDto};
use commerce_core::payload::{CityPatch, DepartmentPatch, NewCity, NewDepartment};
use commerce_db::Database;

use crate::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone)]
pub struct GeographyService {
    db: Database,
}

impl GeographyService {
    pub fn new(db: Database) -> Self {
        GeographyService { db }
    }

    // =========================================================================
    // Departments
    // =========================================================================

    pub async fn list_departments(&self) -> ServiceResult<Vec<DepartmentDto>> {
        let departments = self.db.departments().list().await?;
        Ok(departments.into_iter().map(DepartmentDto::from).collect())
    }

    pub async fn get_department(&self, id: i64) -> ServiceResult<DepartmentDto> {
        self.db
            .departments()
            .get_by_id(id)
            .await?
            .map(DepartmentDto::from)
            .ok_or_else(|| ServiceError::not_found("Department", id))
    }

    pub async fn create_department(&self, new: NewDepartment) -> ServiceResult<DepartmentDto> {
        new.validate()?;
        let department = self.db.departments().insert(&new).await?;
        info!(id = department.id, name = %department.name, "Department created");
        Ok(department.into())
    }

    pub async fn update_department(
        &self,
        id: i64,
        patch: DepartmentPatch,
    ) -> ServiceResult<DepartmentDto> {
        patch.validate()?;
        let repo = self.db.departments();
        let mut department = repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Department", id))?;

        patch.apply_to(&mut department);
        repo.update(&department).await?;
        Ok(department.into())
    }

    /// Fails with Conflict while any city belongs to the department.
    pub async fn delete_department(&self, id: i64) -> ServiceResult<()> {
        self.db.departments().delete(id).await?;
        info!(id = id, "Department deleted");
        Ok(())
    }

    // =========================================================================
    // Cities
    // =========================================================================

    pub async fn list_cities(&self) -> ServiceResult<Vec<CityDto>> {
        let cities = self.db.cities().list().await?;
        Ok(cities.into_iter().map(CityDto::from).collect())
    }

    pub async fn get_city(&self, id: i64) -> ServiceResult<CityDto> {
        self.db
            .cities()
            .get_by_id(id)
            .await?
            .map(CityDto::from)
            .ok_or_else(|| ServiceError::not_found("City", id))
    }

    pub async fn cities_by_department(&self, department_id: i64) -> ServiceResult<Vec<CityDto>> {
        let cities = self.db.cities().find_by_department(department_id).await?;
        Ok(cities.into_iter().map(CityDto::from).collect())
    }

    pub async fn create_city(&self, new: NewCity) -> ServiceResult<CityDto> {
        new.validate()?;
        self.require_department(new.department_id).await?;

        let city = self.db.cities().insert(&new).await?;
        info!(id = city.id, name = %city.name, "City created");
        Ok(city.into())
    }

    pub async fn update_city(&self, id: i64, patch: CityPatch) -> ServiceResult<CityDto> {
        patch.validate()?;
        let repo = self.db.cities();
        let mut city = repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("City", id))?;

        if let Some(department_id) = patch.department_id {
            self.require_department(department_id).await?;
        }

        patch.apply_to(&mut city);
        repo.update(&city).await?;
        Ok(city.into())
    }

    pub async fn delete_city(&self, id: i64) -> ServiceResult<()> {
        self.db.cities().delete(id).await?;
        info!(id = id, "City deleted");
        Ok(())
    }

    async fn require_department(&self, id: i64) -> ServiceResult<()> {
        match self.db.departments().get_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found("Department", id)),
        }
    }
}
