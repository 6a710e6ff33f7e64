use serde::{Deserialize, Serialize};

/// The meeting parameters accumulated across turns. Also used as the
/// partial extraction returned by the interpreter: every field is optional
/// and absent keys deserialize to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetingRequest {
    pub tipo_reunion: Option<String>,
    pub sede: Option<String>,
    pub fecha: Option<String>,
    pub hora: Option<String>,
    pub asistentes: Option<u32>,
    pub restricciones: Option<String>,
    pub presupuesto: Option<f64>,
    pub solicitante: Option<String>,
}

/// The fields that must be present before a recommendation can be made.
/// `restricciones` is deliberately absent: no restrictions is a valid answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RequiredField {
    TipoReunion,
    Sede,
    Fecha,
    Hora,
    Asistentes,
    Presupuesto,
    Solicitante,
}

impl RequiredField {
    pub const ALL: [RequiredField; 7] = [
        RequiredField::TipoReunion,
        RequiredField::Sede,
        RequiredField::Fecha,
        RequiredField::Hora,
        RequiredField::Asistentes,
        RequiredField::Presupuesto,
        RequiredField::Solicitante,
    ];

    /// Human-readable Spanish label, article included, for the
    /// missing-fields clause appended to replies.
    pub fn label(&self) -> &'static str {
        match self {
            RequiredField::TipoReunion => "el tipo de reunión",
            RequiredField::Sede => "la sede",
            RequiredField::Fecha => "la fecha",
            RequiredField::Hora => "la hora",
            RequiredField::Asistentes => "el número de asistentes",
            RequiredField::Presupuesto => "el presupuesto",
            RequiredField::Solicitante => "el nombre del solicitante",
        }
    }
}

fn set_text(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
}

impl MeetingRequest {
    /// Shallow override merge: non-empty/non-zero incoming values replace
    /// the current ones, empty or absent values never clear a set field.
    pub fn merge(&mut self, extracted: &MeetingRequest) {
        merge_text(&mut self.tipo_reunion, &extracted.tipo_reunion);
        merge_text(&mut self.sede, &extracted.sede);
        merge_text(&mut self.fecha, &extracted.fecha);
        merge_text(&mut self.hora, &extracted.hora);
        merge_text(&mut self.restricciones, &extracted.restricciones);
        merge_text(&mut self.solicitante, &extracted.solicitante);

        if let Some(n) = extracted.asistentes {
            if n > 0 {
                self.asistentes = Some(n);
            }
        }
        if let Some(p) = extracted.presupuesto {
            if p > 0.0 {
                self.presupuesto = Some(p);
            }
        }
    }

    pub fn missing_fields(&self) -> Vec<RequiredField> {
        RequiredField::ALL
            .into_iter()
            .filter(|field| !self.has(*field))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn clear(&mut self) {
        *self = MeetingRequest::default();
    }

    /// Budget divided by head count, the per-person price ceiling used for
    /// catalog filtering. None until both fields are set.
    pub fn budget_per_person(&self) -> Option<f64> {
        match (self.presupuesto, self.asistentes) {
            (Some(budget), Some(attendees)) if attendees > 0 => {
                Some(budget / attendees as f64)
            }
            _ => None,
        }
    }

    fn has(&self, field: RequiredField) -> bool {
        match field {
            RequiredField::TipoReunion => set_text(&self.tipo_reunion),
            RequiredField::Sede => set_text(&self.sede),
            RequiredField::Fecha => set_text(&self.fecha),
            RequiredField::Hora => set_text(&self.hora),
            RequiredField::Asistentes => self.asistentes.map(|n| n > 0).unwrap_or(false),
            RequiredField::Presupuesto => self.presupuesto.map(|p| p > 0.0).unwrap_or(false),
            RequiredField::Solicitante => set_text(&self.solicitante),
        }
    }
}

fn merge_text(current: &mut Option<String>, incoming: &Option<String>) {
    if let Some(v) = incoming {
        if !v.trim().is_empty() {
            *current = Some(v.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overwrites_with_new_values() {
        let mut req = MeetingRequest {
            tipo_reunion: Some("almuerzo".to_string()),
            ..Default::default()
        };
        req.merge(&MeetingRequest {
            tipo_reunion: Some("cena".to_string()),
            sede: Some("Sede Norte".to_string()),
            ..Default::default()
        });
        assert_eq!(req.tipo_reunion.as_deref(), Some("cena"));
        assert_eq!(req.sede.as_deref(), Some("Sede Norte"));
    }

    #[test]
    fn test_merge_never_clears_set_fields() {
        let mut req = MeetingRequest {
            sede: Some("Sede Norte".to_string()),
            asistentes: Some(10),
            presupuesto: Some(500000.0),
            ..Default::default()
        };
        req.merge(&MeetingRequest {
            sede: Some("  ".to_string()),
            asistentes: Some(0),
            presupuesto: Some(0.0),
            ..Default::default()
        });
        assert_eq!(req.sede.as_deref(), Some("Sede Norte"));
        assert_eq!(req.asistentes, Some(10));
        assert_eq!(req.presupuesto, Some(500000.0));
    }

    #[test]
    fn test_completeness_requires_all_seven() {
        let mut req = MeetingRequest {
            tipo_reunion: Some("almuerzo".to_string()),
            fecha: Some("20/05/2025".to_string()),
            hora: Some("13:00".to_string()),
            asistentes: Some(10),
            presupuesto: Some(500000.0),
            solicitante: Some("Carla".to_string()),
            ..Default::default()
        };
        assert!(!req.is_complete());
        assert_eq!(req.missing_fields(), vec![RequiredField::Sede]);

        req.sede = Some("Sede Norte".to_string());
        assert!(req.is_complete());
    }

    #[test]
    fn test_restricciones_not_required() {
        let req = MeetingRequest {
            tipo_reunion: Some("almuerzo".to_string()),
            sede: Some("Sede Norte".to_string()),
            fecha: Some("20/05/2025".to_string()),
            hora: Some("13:00".to_string()),
            asistentes: Some(10),
            presupuesto: Some(500000.0),
            solicitante: Some("Carla".to_string()),
            restricciones: None,
        };
        assert!(req.is_complete());
    }

    #[test]
    fn test_budget_per_person() {
        let req = MeetingRequest {
            presupuesto: Some(100000.0),
            asistentes: Some(10),
            ..Default::default()
        };
        assert_eq!(req.budget_per_person(), Some(10000.0));
        assert_eq!(MeetingRequest::default().budget_per_person(), None);
    }

    #[test]
    fn test_clear() {
        let mut req = MeetingRequest {
            solicitante: Some("Carla".to_string()),
            ..Default::default()
        };
        req.clear();
        assert_eq!(req, MeetingRequest::default());
    }
}
