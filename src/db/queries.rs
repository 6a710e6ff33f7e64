use rusqlite::{params_from_iter, Connection};

use crate::models::{MenuOffering, NamedRow, ValidValueSet};

/// Optional predicate parts for the offering query. Absent parts are left
/// out of the WHERE clause entirely, no defaults are substituted.
#[derive(Debug, Default, Clone)]
pub struct OfferingFilter {
    pub tipo: Option<String>,
    pub max_price_per_person: Option<f64>,
}

pub fn fetch_valid_values(conn: &Connection) -> anyhow::Result<ValidValueSet> {
    let mut stmt = conn.prepare("SELECT DISTINCT tipo FROM menu_proveedor ORDER BY tipo")?;
    let tipos = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ValidValueSet {
        tipos,
        sedes: fetch_named_rows(conn, "SELECT id, nombre FROM sede ORDER BY id")?,
        ciudades: fetch_named_rows(conn, "SELECT id, nombre FROM ciudad ORDER BY id")?,
        proveedores: fetch_named_rows(conn, "SELECT id, nombre FROM proveedor ORDER BY id")?,
    })
}

fn fetch_named_rows(conn: &Connection, sql: &str) -> anyhow::Result<Vec<NamedRow>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(NamedRow {
                id: row.get(0)?,
                nombre: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn fetch_menu_offerings(
    conn: &Connection,
    filter: &OfferingFilter,
) -> anyhow::Result<Vec<MenuOffering>> {
    let mut sql = String::from(
        "SELECT mp.id, mp.plato, mp.descripcion, mp.precio, mp.tipo,
                p.nombre AS proveedor, c.nombre AS ciudad
         FROM menu_proveedor mp
         JOIN proveedor p ON mp.proveedor_id = p.id
         JOIN ciudad c ON p.ciudad_id = c.id
         WHERE 1=1",
    );

    let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = vec![];

    if let Some(tipo) = &filter.tipo {
        sql.push_str(&format!(" AND mp.tipo = ?{}", params.len() + 1));
        params.push(Box::new(tipo.clone()));
    }
    if let Some(ceiling) = filter.max_price_per_person {
        sql.push_str(&format!(" AND mp.precio <= ?{}", params.len() + 1));
        params.push(Box::new(ceiling));
    }

    sql.push_str(" ORDER BY mp.precio ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(params.iter().map(|p| p.as_ref())), |row| {
            Ok(MenuOffering {
                id: row.get(0)?,
                plato: row.get(1)?,
                descripcion: row.get(2)?,
                precio: row.get(3)?,
                tipo: row.get(4)?,
                proveedor: row.get(5)?,
                ciudad: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}
