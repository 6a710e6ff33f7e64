use std::time::Duration;

use anyhow::Context;

use crate::models::{MeetingRequest, MenuOffering};
use crate::services::ai::LlmProvider;

/// Asks the model to pick the best offering for a complete request, or to
/// say none fits. All decision-making is delegated; the reply is returned
/// verbatim. Callers must pass a non-empty, already-filtered offering list.
pub async fn recommend(
    llm: &dyn LlmProvider,
    timeout: Duration,
    offerings: &[MenuOffering],
    request: &MeetingRequest,
) -> anyhow::Result<String> {
    if offerings.is_empty() {
        anyhow::bail!("no hay menús disponibles para analizar");
    }
    if request.tipo_reunion.is_none() || request.sede.is_none() {
        anyhow::bail!("faltan parámetros necesarios para la búsqueda de menús");
    }

    let prompt = build_prompt(offerings, request)?;

    let reply = tokio::time::timeout(timeout, llm.generate(&prompt))
        .await
        .context("la generación de la recomendación excedió el tiempo límite")?
        .context("falló la generación de la recomendación")?;

    Ok(reply)
}

fn build_prompt(offerings: &[MenuOffering], request: &MeetingRequest) -> anyhow::Result<String> {
    let offerings_json =
        serde_json::to_string_pretty(offerings).context("failed to serialize offerings")?;

    let restricciones = match request.restricciones.as_deref() {
        Some(r) if !r.trim().is_empty() => format!("Sí, {r}"),
        _ => "Ninguna".to_string(),
    };

    let per_person = request
        .budget_per_person()
        .map(|p| format!("{p:.0}"))
        .unwrap_or_else(|| "desconocido".to_string());

    Ok(format!(
        "Necesito que me ayudes con la siguiente decisión:\n\n\
         {offerings_json}\n\n\
         Tengo esta reunión:\n\
         - Tipo de reunión: {tipo}\n\
         - Sede donde se realizará la reunión: {sede}\n\
         - Fecha y horario aproximado del evento: {fecha}, {hora}\n\
         - Número estimado de participantes: {asistentes}\n\
         - Presupuesto por persona: ${per_person}\n\
         - ¿Existen restricciones alimentarias o alergias que debamos considerar?: {restricciones}\n\n\
         ¿Qué menú me recomiendas? Si no hay ninguno que se adapte, dímelo.",
        tipo = request.tipo_reunion.as_deref().unwrap_or(""),
        sede = request.sede.as_deref().unwrap_or(""),
        fecha = request.fecha.as_deref().unwrap_or(""),
        hora = request.hora.as_deref().unwrap_or(""),
        asistentes = request.asistentes.unwrap_or(0),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoLlm;

    #[async_trait]
    impl LlmProvider for EchoLlm {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            Ok("Te recomiendo el Almuerzo Ejecutivo.".to_string())
        }
    }

    fn complete_request() -> MeetingRequest {
        MeetingRequest {
            tipo_reunion: Some("almuerzo".to_string()),
            sede: Some("Sede Norte".to_string()),
            fecha: Some("20/05/2025".to_string()),
            hora: Some("13:00".to_string()),
            asistentes: Some(10),
            presupuesto: Some(500000.0),
            solicitante: Some("Carla".to_string()),
            restricciones: None,
        }
    }

    fn offering() -> MenuOffering {
        MenuOffering {
            id: 1,
            plato: "Almuerzo Ejecutivo".to_string(),
            descripcion: "Proteína, arroz y ensalada".to_string(),
            precio: 18000.0,
            tipo: "almuerzo".to_string(),
            proveedor: "Sabores de Casa".to_string(),
            ciudad: "Bogotá".to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_offerings_rejected() {
        let err = recommend(&EchoLlm, Duration::from_secs(5), &[], &complete_request())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no hay menús"));
    }

    #[tokio::test]
    async fn test_incomplete_request_rejected() {
        let mut request = complete_request();
        request.sede = None;
        let err = recommend(&EchoLlm, Duration::from_secs(5), &[offering()], &request)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("faltan parámetros"));
    }

    #[tokio::test]
    async fn test_returns_model_reply_verbatim() {
        let reply = recommend(
            &EchoLlm,
            Duration::from_secs(5),
            &[offering()],
            &complete_request(),
        )
        .await
        .unwrap();
        assert_eq!(reply, "Te recomiendo el Almuerzo Ejecutivo.");
    }

    #[test]
    fn test_prompt_includes_per_person_budget_and_restrictions_default() {
        let prompt = build_prompt(&[offering()], &complete_request()).unwrap();
        assert!(prompt.contains("Presupuesto por persona: $50000"));
        assert!(prompt.contains("Ninguna"));
        assert!(prompt.contains("Almuerzo Ejecutivo"));
    }
}
