//! Prompt text and response schemas sent to the model.

use serde_json::{json, Value};

use crate::model::LegalProcess;

pub fn call_triage(information: &str) -> String {
  format!(
    "Você faz a triagem das ligações recebidas por um escritório de advocacia. \
     Classifique o pedido abaixo com uma prioridade (Baixa, Média ou Alta) e \
     um assunto curto de no máximo três palavras.\n\n\
     Pedido: \"{information}\""
  )
}

pub fn call_triage_schema() -> Value {
  json!({
    "type": "OBJECT",
    "properties": {
      "priority": { "type": "STRING", "enum": ["Baixa", "Média", "Alta"] },
      "category": { "type": "STRING", "description": "Assunto em até três palavras" }
    },
    "required": ["priority", "category"]
  })
}

pub fn interview_summary(notes: &str) -> String {
  format!(
    "Você apoia advogados na conversão de potenciais clientes. Leia as notas \
     da entrevista abaixo e devolva um JSON com: \"summary\" (um parágrafo \
     curto sobre o caso), \"rightsFound\" (direitos ou pedidos possíveis), \
     \"urgencyScore\" (1 a 10, sendo 10 o mais urgente) e \"conversionPitch\" \
     (um argumento para fechar o contrato).\n\n\
     Notas: \"{notes}\""
  )
}

pub fn interview_summary_schema() -> Value {
  json!({
    "type": "OBJECT",
    "properties": {
      "summary": { "type": "STRING" },
      "rightsFound": { "type": "ARRAY", "items": { "type": "STRING" } },
      "urgencyScore": { "type": "NUMBER" },
      "conversionPitch": { "type": "STRING" }
    },
    "required": ["summary", "rightsFound", "urgencyScore", "conversionPitch"]
  })
}

pub fn process_review(process: &LegalProcess) -> String {
  let decisions = match process.decisions.as_deref() {
    Some(list) if !list.is_empty() => list.join("; "),
    _ => "Nenhuma registrada".to_string(),
  };
  format!(
    "Atue como consultor jurídico sênior e avalie estrategicamente o processo \
     a seguir. Traga um resumo crítico da situação, os riscos jurídicos, os \
     próximos passos sugeridos e três alternativas estratégicas para o \
     advogado responsável.\n\n\
     Título: {title}\n\
     Fase atual: {phase}\n\
     Descrição: {description}\n\
     Petição inicial: {petition}\n\
     Decisões: {decisions}\n\
     Sentença: {sentence}",
    title = process.title,
    phase = process.phase,
    description = process.description,
    petition = process.initial_petition.as_deref().unwrap_or("Não informada"),
    sentence = process.sentence.as_deref().unwrap_or("Não proferida"),
  )
}

pub fn process_review_schema() -> Value {
  json!({
    "type": "OBJECT",
    "properties": {
      "situationSummary": { "type": "STRING" },
      "risks": { "type": "ARRAY", "items": { "type": "STRING" } },
      "suggestions": { "type": "ARRAY", "items": { "type": "STRING" } },
      "strategicOptions": {
        "type": "ARRAY",
        "items": {
          "type": "OBJECT",
          "properties": {
            "label": { "type": "STRING" },
            "description": { "type": "STRING" }
          },
          "required": ["label", "description"]
        }
      }
    },
    "required": ["situationSummary", "risks", "suggestions", "strategicOptions"]
  })
}
