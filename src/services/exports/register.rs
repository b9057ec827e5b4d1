//! 导出驱动注册表，按配置中的驱动名查找

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use once_cell::sync::Lazy;

use super::drivers::{
    CertificatesService, EnrollmentSheetService, GenericCertificates, GenericEnrollmentSheet,
};
use crate::errors::{AcademyError, Result};

type CertificatesConstructor = fn() -> Arc<dyn CertificatesService>;
type EnrollmentSheetConstructor = fn() -> Arc<dyn EnrollmentSheetService>;

static CERTIFICATE_DRIVERS: Lazy<RwLock<HashMap<String, CertificatesConstructor>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

static ENROLLMENT_SHEET_DRIVERS: Lazy<RwLock<HashMap<String, EnrollmentSheetConstructor>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

pub fn register_certificates_driver<S: Into<String>>(name: S, constructor: CertificatesConstructor) {
    CERTIFICATE_DRIVERS
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .insert(name.into(), constructor);
}

pub fn register_enrollment_sheet_driver<S: Into<String>>(
    name: S,
    constructor: EnrollmentSheetConstructor,
) {
    ENROLLMENT_SHEET_DRIVERS
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .insert(name.into(), constructor);
}

pub fn certificates_driver(name: &str) -> Result<Arc<dyn CertificatesService>> {
    CERTIFICATE_DRIVERS
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(name)
        .map(|constructor| constructor())
        .ok_or_else(|| {
            AcademyError::export_driver_not_found(format!("Unknown certificates driver: {name}"))
        })
}

pub fn enrollment_sheet_driver(name: &str) -> Result<Arc<dyn EnrollmentSheetService>> {
    ENROLLMENT_SHEET_DRIVERS
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(name)
        .map(|constructor| constructor())
        .ok_or_else(|| {
            AcademyError::export_driver_not_found(format!(
                "Unknown enrollment sheet driver: {name}"
            ))
        })
}

#[ctor::ctor]
unsafe fn register_generic_drivers() {
    register_certificates_driver("generic", || Arc::new(GenericCertificates));
    register_enrollment_sheet_driver("generic", || Arc::new(GenericEnrollmentSheet));
}
