use serde_json::{Value, json};

use tarot_core::model::CardName;

pub const SYSTEM_INSTRUCTION: &str = "Eres un experto mundial en Tarot y un educador. Tus explicaciones son claras, profundas y atractivas para principiantes. Creas contenido en un formato educativo y gamificado. Responde SIEMPRE en español y SOLO con el formato JSON definido en el esquema de respuesta.";

/// Everything a provider needs to produce one lesson.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub system_instruction: &'static str,
    pub response_schema: Value,
}

impl GenerationRequest {
    #[must_use]
    pub fn for_card(card: &CardName) -> Self {
        Self {
            prompt: format!(
                "Genera una lección detallada y gamificada para la carta del Tarot: \"{card}\"."
            ),
            system_instruction: SYSTEM_INSTRUCTION,
            response_schema: lesson_schema(),
        }
    }
}

/// Structured-output schema for `LessonContent`, in the provider's
/// OpenAPI-subset dialect.
#[must_use]
pub fn lesson_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": {
                "type": "STRING",
                "description": "Nombre de la carta de Tarot en español."
            },
            "description": {
                "type": "STRING",
                "description": "Un resumen simple y de un párrafo para principiantes en español."
            },
            "story": {
                "type": "STRING",
                "description": "Una historia o alegoría atractiva que representa el viaje de la carta en español."
            },
            "keywords": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Una lista de palabras clave asociadas con la carta en español."
            },
            "uprightMeaning": {
                "type": "STRING",
                "description": "Significado detallado cuando la carta está al derecho en español."
            },
            "reversedMeaning": {
                "type": "STRING",
                "description": "Significado detallado cuando la carta está invertida en español."
            },
            "quiz": {
                "type": "ARRAY",
                "description": "Un breve cuestionario de opción múltiple de 2 preguntas para evaluar la comprensión en español.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "question": { "type": "STRING" },
                        "options": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" }
                        },
                        "correctAnswer": {
                            "type": "STRING",
                            "description": "La cadena de texto exacta de la opción correcta."
                        }
                    },
                    "required": ["question", "options", "correctAnswer"]
                }
            }
        },
        "required": [
            "name",
            "description",
            "story",
            "keywords",
            "uprightMeaning",
            "reversedMeaning",
            "quiz"
        ]
    })
}
