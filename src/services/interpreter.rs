use std::time::Duration;

use crate::models::{MeetingRequest, TurnIntent, TurnInterpretation, ValidValueSet};
use crate::services::ai::LlmProvider;

/// Fallback shown whenever the model cannot be reached or its output cannot
/// be parsed. The user only ever sees a fresh greeting, never an error.
pub const FALLBACK_GREETING: &str = "¡Hola! Soy tu asistente para planificación de reuniones. \
    ¿Qué tipo de reunión necesitas organizar?";

const PROMPT_HEADER: &str = r#"Eres un asistente experto en planificación de reuniones. Tu tarea es analizar el mensaje del usuario y extraer información relevante para una recomendación de menú.

INSTRUCCIONES:
1. Si el usuario no ha proporcionado información válida o es un saludo inicial, responde con un saludo y solicita el tipo de reunión.
2. Analiza el mensaje para extraer cualquier información sobre: tipo de reunión, sede, fecha, hora, número de asistentes, restricciones alimentarias, presupuesto y nombre del solicitante.
3. Si el usuario menciona restricciones alimentarias, captura todos los detalles.
4. Si el usuario pregunta algo fuera de tema, indícale amablemente que solo podemos ayudarle con la planificación de reuniones.
5. Si el usuario está agradeciendo o haciendo preguntas después de recibir una recomendación, finaliza la conversación actual y ofrece ayuda para una nueva reunión.

Responde SOLO con un objeto JSON válido con esta estructura:
{
  "type": "greeting" | "menu_info" | "restrictions" | "unknown" | "conversation_end",
  "extracted": {
    "tipo_reunion": string | null,
    "sede": string | null,
    "fecha": string | null,
    "hora": string | null,
    "asistentes": number | null,
    "restricciones": string | null,
    "presupuesto": number | null,
    "solicitante": string | null
  },
  "message": string,
  "end_conversation": boolean
}

REGLAS PARA EL MENSAJE:
1. Si se extrajo nueva información, confírmala y pregunta por la siguiente información faltante.
2. Si no se extrajo información nueva, pide amablemente la información que falta.
3. Si se completó toda la información, indica que procederás con la recomendación.
4. Sé amigable y natural en tus respuestas."#;

/// Runs one interpreter call. Infallible by design: timeouts, transport
/// failures, malformed JSON and schema violations all collapse into the
/// canned greeting with empty extraction.
pub async fn interpret(
    llm: &dyn LlmProvider,
    timeout: Duration,
    input: &str,
    request: &MeetingRequest,
    valid_values: &ValidValueSet,
) -> TurnInterpretation {
    let prompt = build_prompt(input, request, valid_values);

    let response = match tokio::time::timeout(timeout, llm.generate(&prompt)).await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "interpreter LLM call failed, using fallback");
            return fallback();
        }
        Err(_) => {
            tracing::warn!(timeout = ?timeout, "interpreter LLM call timed out, using fallback");
            return fallback();
        }
    };

    match parse_interpretation(&response) {
        Ok(interp) => interp,
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse interpreter response, using fallback");
            fallback()
        }
    }
}

fn build_prompt(input: &str, request: &MeetingRequest, valid_values: &ValidValueSet) -> String {
    let known = known_fields(request);
    let known_block = if known.is_empty() {
        "(ninguna todavía)".to_string()
    } else {
        known.join("\n")
    };

    let sedes = valid_values
        .sedes
        .iter()
        .map(|s| s.nombre.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "{PROMPT_HEADER}\n\n\
         Mensaje del usuario: \"{input}\"\n\n\
         Información actual recopilada:\n{known_block}\n\n\
         Valores válidos disponibles:\n\
         Tipos de reunión: {tipos}\n\
         Sedes: {sedes}",
        tipos = valid_values.tipos.join(", "),
    )
}

fn known_fields(request: &MeetingRequest) -> Vec<String> {
    let mut fields = vec![];
    let mut text = |name: &str, value: &Option<String>| {
        if let Some(v) = value {
            if !v.trim().is_empty() {
                fields.push(format!("{name}: {v}"));
            }
        }
    };
    text("tipo_reunion", &request.tipo_reunion);
    text("sede", &request.sede);
    text("fecha", &request.fecha);
    text("hora", &request.hora);
    text("restricciones", &request.restricciones);
    text("solicitante", &request.solicitante);
    if let Some(n) = request.asistentes {
        fields.push(format!("asistentes: {n}"));
    }
    if let Some(p) = request.presupuesto {
        fields.push(format!("presupuesto: {p}"));
    }
    fields
}

fn fallback() -> TurnInterpretation {
    TurnInterpretation {
        intent: TurnIntent::Greeting,
        extracted: MeetingRequest::default(),
        message: FALLBACK_GREETING.to_string(),
        end_conversation: false,
    }
}

/// Parses the model reply, tolerating markdown fences and surrounding prose.
/// On conversation_end the extracted fields are discarded and the end flag
/// forced, so a closing turn can never bleed stale data into a new request.
pub fn parse_interpretation(response: &str) -> anyhow::Result<TurnInterpretation> {
    let mut interp = parse_json_payload(response)?;

    if interp.intent == TurnIntent::ConversationEnd {
        interp.end_conversation = true;
        interp.extracted = MeetingRequest::default();
    }

    Ok(interp)
}

fn parse_json_payload(response: &str) -> anyhow::Result<TurnInterpretation> {
    if let Ok(interp) = serde_json::from_str::<TurnInterpretation>(response) {
        return Ok(interp);
    }

    // Strip markdown code fences
    let cleaned = response
        .trim()
        .strip_prefix("```json")
        .or_else(|| response.trim().strip_prefix("```"))
        .unwrap_or(response.trim());
    let cleaned = cleaned.strip_suffix("```").unwrap_or(cleaned).trim();

    if let Ok(interp) = serde_json::from_str::<TurnInterpretation>(cleaned) {
        return Ok(interp);
    }

    // Try to find a JSON object embedded in prose
    if let Some(start) = cleaned.find('{') {
        if let Some(end) = cleaned.rfind('}') {
            if let Ok(interp) = serde_json::from_str::<TurnInterpretation>(&cleaned[start..=end]) {
                return Ok(interp);
            }
        }
    }

    anyhow::bail!("response is not a valid interpretation object")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_json() {
        let json = r#"{"type":"menu_info","extracted":{"tipo_reunion":"almuerzo","asistentes":10,"fecha":"20/05/2025","hora":"13:00","presupuesto":500000,"solicitante":"Carla"},"message":"¡Perfecto, Carla!","end_conversation":false}"#;
        let interp = parse_interpretation(json).unwrap();
        assert_eq!(interp.intent, TurnIntent::MenuInfo);
        assert_eq!(interp.extracted.tipo_reunion.as_deref(), Some("almuerzo"));
        assert_eq!(interp.extracted.asistentes, Some(10));
        assert_eq!(interp.extracted.presupuesto, Some(500000.0));
        assert_eq!(interp.extracted.sede, None);
        assert!(!interp.end_conversation);
    }

    #[test]
    fn test_parse_markdown_fenced_json() {
        let json = "```json\n{\"type\":\"greeting\",\"extracted\":{},\"message\":\"¡Hola!\",\"end_conversation\":false}\n```";
        let interp = parse_interpretation(json).unwrap();
        assert_eq!(interp.intent, TurnIntent::Greeting);
        assert_eq!(interp.message, "¡Hola!");
    }

    #[test]
    fn test_parse_json_embedded_in_prose() {
        let text = "Claro, aquí tienes: {\"type\":\"unknown\",\"extracted\":{},\"message\":\"No entendí\",\"end_conversation\":false} espero que sirva";
        let interp = parse_interpretation(text).unwrap();
        assert_eq!(interp.intent, TurnIntent::Unknown);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(parse_interpretation("no soy JSON").is_err());
        assert!(parse_interpretation("{\"type\":\"menu_info\"").is_err());
    }

    #[test]
    fn test_missing_required_keys_is_error() {
        // No "message" key: schema violation
        assert!(parse_interpretation(r#"{"type":"greeting","extracted":{}}"#).is_err());
        // No "extracted" object: also a schema violation, the reply must not
        // pass through just because the intent and message look plausible
        assert!(
            parse_interpretation(r#"{"type":"menu_info","message":"dame más datos"}"#).is_err()
        );
        // No "type" key
        assert!(parse_interpretation(r#"{"extracted":{},"message":"hola"}"#).is_err());
    }

    #[test]
    fn test_conversation_end_discards_extracted_fields() {
        let json = r#"{"type":"conversation_end","extracted":{"tipo_reunion":"cena","solicitante":"Pedro"},"message":"¡Gracias! Hasta pronto.","end_conversation":false}"#;
        let interp = parse_interpretation(json).unwrap();
        assert!(interp.end_conversation);
        assert_eq!(interp.extracted, MeetingRequest::default());
    }

    #[tokio::test]
    async fn test_interpret_falls_back_on_garbage() {
        struct ProseLlm;

        #[async_trait::async_trait]
        impl crate::services::ai::LlmProvider for ProseLlm {
            async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
                Ok("Lo siento, no puedo responder en ese formato".to_string())
            }
        }

        let values = crate::models::ValidValueSet {
            tipos: vec!["almuerzo".to_string()],
            sedes: vec![],
            ciudades: vec![],
            proveedores: vec![],
        };
        let interp = interpret(
            &ProseLlm,
            Duration::from_secs(5),
            "hola",
            &MeetingRequest::default(),
            &values,
        )
        .await;

        assert_eq!(interp.intent, TurnIntent::Greeting);
        assert_eq!(interp.message, FALLBACK_GREETING);
        assert!(!interp.end_conversation);
    }
}
