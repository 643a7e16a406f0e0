//! Prompt templates for model-assisted stages

use crate::analysis::knowledge::SimilarCase;
use crate::analysis::pipeline::DecisionInputs;
use crate::decision::rules::{HEURISTIC_GUIDANCE, SENTIMENT_ESCALATION_THRESHOLD};
use serde_json::{Value, json};

/// Sampling temperature for arbitration; kept low so decisions are reproducible.
pub const DECISION_TEMPERATURE: f64 = 0.2;
/// Sampling temperature for solution adaptation.
pub const SOLUTION_TEMPERATURE: f64 = 0.3;

/// Templates for generating prompts and their expected output schemas
pub struct PromptTemplate;

impl PromptTemplate {
    /// Arbitration prompt, used only when no override rule matched.
    pub fn decision_prompt(inputs: &DecisionInputs<'_>) -> String {
        let c = inputs.classification;
        let k = inputs.knowledge;
        let s = inputs.sentiment;

        let mut rules = format!(
            "1. If sentiment >= {:.2} -> ESCALATE_TO_HUMAN (override everything)\n\
             2. If churn_risk = true -> ESCALATE_TO_MANAGER\n\
             3. If category = BUG -> ESCALATE_TO_HUMAN (needs engineering)\n",
            SENTIMENT_ESCALATION_THRESHOLD
        );
        for (i, t) in HEURISTIC_GUIDANCE.iter().enumerate() {
            rules.push_str(&format!(
                "{}. If solution_confidence >= {:.2} AND sentiment < {:.2} -> AUTO_RESOLVE\n",
                i + 4,
                t.min_knowledge_confidence,
                t.max_sentiment
            ));
        }
        rules.push_str(&format!(
            "{}. Otherwise -> ESCALATE_TO_HUMAN with context",
            HEURISTIC_GUIDANCE.len() + 4
        ));

        format!(
            r#"You are a decision engine for a customer support system. Analyze all the signals and make a final decision.

Classification Results:
- Category: {category}
- Confidence: {class_conf}

Knowledge Results:
- Solution Found: {solution}
- Solution Confidence: {knowledge_conf}
- Solvable Without Escalation: {solvable}

Sentiment Results:
- Sentiment Score: {score}
- Level: {level}
- Churn Risk: {churn}
- Requires Human: {requires_human}

Decision Rules:
{rules}

Make a decision and provide reasoning.

Return a JSON object with:
- decision: AUTO_RESOLVE, ESCALATE_TO_HUMAN, or ESCALATE_TO_MANAGER
- confidence: Confidence in decision (0.0 to 1.0)
- reasoning: Explanation of decision
- priority: LOW, MEDIUM, HIGH, or URGENT
- sla_minutes: SLA in minutes (5 for high priority, 15 for medium, 60 for low)"#,
            category = c.category,
            class_conf = c.confidence,
            solution = k.solution.as_deref().unwrap_or("N/A"),
            knowledge_conf = k.confidence_or_zero(),
            solvable = k.solvable_without_escalation,
            score = s.score,
            level = s.level,
            churn = s.churn_risk,
            requires_human = s.requires_human,
            rules = rules,
        )
    }

    pub fn decision_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "decision": {
                    "type": "string",
                    "enum": ["AUTO_RESOLVE", "ESCALATE_TO_HUMAN", "ESCALATE_TO_MANAGER"]
                },
                "confidence": { "type": "number", "minimum": 0.0, "maximum": 1.0 },
                "reasoning": { "type": "string" },
                "priority": { "type": "string", "enum": ["LOW", "MEDIUM", "HIGH", "URGENT"] },
                "sla_minutes": { "type": "integer" }
            },
            "required": ["decision", "confidence", "reasoning"]
        })
    }

    /// Prompt asking the model to adapt retrieved resolutions to this ticket.
    pub fn solution_prompt(ticket_text: &str, cases: &[SimilarCase], category: Option<&str>) -> String {
        let cases_text = cases
            .iter()
            .enumerate()
            .map(|(i, case)| {
                format!(
                    "Case {}:\n  Issue: {}\n  Solution: {}\n  Similarity: {:.2}",
                    i + 1,
                    if case.text.is_empty() { "N/A" } else { &case.text },
                    case.resolution().unwrap_or("N/A"),
                    case.similarity
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            r#"You found similar cases for this ticket. Adapt the solution to the current customer's issue.

Current Ticket:
{}

Category: {}

Similar Cases Found:
{}

Analyze these similar cases and determine:
1. Can this ticket be solved using the solutions from similar cases?
2. What is the best solution for this specific ticket?
3. What is your confidence level (0.0 to 1.0)?

Return a JSON object with:
- solution: The recommended solution for this ticket
- confidence: Confidence score (0.0 to 1.0)
- solvable_without_escalation: true if bot can handle, false if human needed
- reasoning: Brief explanation"#,
            ticket_text,
            category.unwrap_or("UNKNOWN"),
            cases_text
        )
    }

    pub fn solution_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "solution": { "type": "string" },
                "confidence": { "type": "number", "minimum": 0.0, "maximum": 1.0 },
                "solvable_without_escalation": { "type": "boolean" },
                "reasoning": { "type": "string" }
            },
            "required": ["solution", "confidence", "solvable_without_escalation"]
        })
    }
}

/// Fields listed under `required` in `schema` that `value` does not carry.
pub fn missing_required_fields(value: &Value, schema: &Value) -> Vec<String> {
    let Some(required) = schema.get("required").and_then(Value::as_array) else {
        return Vec::new();
    };
    required
        .iter()
        .filter_map(Value::as_str)
        .filter(|field| value.get(*field).is_none_or(Value::is_null))
        .map(str::to_string)
        .collect()
}
