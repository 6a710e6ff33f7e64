use serde::{Deserialize, Serialize};

/// One id/name reference row (sede, ciudad or proveedor).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedRow {
    pub id: i64,
    pub nombre: String,
}

/// Reference lists fetched once per session and fed to the extraction
/// prompt as guidance. Never enforced locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidValueSet {
    pub tipos: Vec<String>,
    pub sedes: Vec<NamedRow>,
    pub ciudades: Vec<NamedRow>,
    pub proveedores: Vec<NamedRow>,
}

/// Read-only catalog row: a dish offered by a provider, joined with the
/// provider and city names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuOffering {
    pub id: i64,
    pub plato: String,
    pub descripcion: String,
    pub precio: f64,
    pub tipo: String,
    pub proveedor: String,
    pub ciudad: String,
}
