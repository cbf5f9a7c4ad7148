use serde_json::{json, Value};

/// Response schema handed to Gemini so the service enforces required fields.
pub fn sermon_output_schema() -> Value {
    let string_list = |description: &str| {
        json!({
            "type": "ARRAY",
            "items": { "type": "STRING" },
            "description": description
        })
    };

    json!({
        "type": "OBJECT",
        "properties": {
            "summaryCard": {
                "type": "OBJECT",
                "properties": {
                    "date": { "type": "STRING", "description": "본문에 언급된 날짜" },
                    "subject": {
                        "type": "STRING",
                        "description": "말씀 원본의 첫 줄 제목 (번호, 날짜, 예배 이름, 괄호 속 성구 제거)"
                    },
                    "coreMessage": string_list("본문 기반 핵심 요약 3~4줄"),
                    "scripture": { "type": "STRING", "description": "본문의 핵심 구절" },
                    "actionPoints": string_list("본문 기반 구체적 실천 사항"),
                    "hashtags": string_list("관련 태그")
                },
                "required": ["date", "subject", "coreMessage", "scripture", "actionPoints", "hashtags"]
            },
            "infographic": {
                "type": "OBJECT",
                "properties": {
                    "title": {
                        "type": "STRING",
                        "description": "summaryCard.subject와 같은 제목"
                    },
                    "subtitle": { "type": "STRING", "description": "본문 기반 한 줄 묵상 문구" },
                    "scripture": { "type": "STRING", "description": "인용 성구" }
                },
                "required": ["title", "subtitle", "scripture"]
            }
        },
        "required": ["summaryCard", "infographic"]
    })
}
