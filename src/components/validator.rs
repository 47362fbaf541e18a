use anyhow::{bail, Result};
use serde_json::Value;

use crate::domain::models::{Homework, StatusReport};

const REQUIRED_KEYS: [&str; 2] = ["homework_name", "status"];

/// API 응답 구조 검증 → StatusReport
///
/// 빈 `homeworks` 리스트는 정상 ("새 상태 없음").
pub fn check_response(response: Value) -> Result<StatusReport> {
    let Value::Object(mut body) = response else {
        bail!("API response must be an object");
    };

    let Some(homeworks) = body.remove("homeworks") else {
        bail!("API response has no 'homeworks' key");
    };

    let Value::Array(items) = homeworks else {
        bail!("'homeworks' must be a list");
    };

    let homeworks = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| check_item(i, item))
        .collect::<Result<Vec<_>>>()?;

    let current_date = match body.get("current_date") {
        None | Some(Value::Null) => None,
        Some(v) => match v.as_i64() {
            Some(ts) => Some(ts),
            None => bail!("'current_date' must be an integer timestamp"),
        },
    };

    Ok(StatusReport {
        homeworks,
        current_date,
    })
}

fn check_item(index: usize, item: Value) -> Result<Homework> {
    let Value::Object(obj) = &item else {
        bail!("homework #{index} must be an object");
    };

    for key in REQUIRED_KEYS {
        match obj.get(key) {
            Some(Value::String(_)) => {}
            Some(_) => bail!("homework #{index}: '{key}' must be a string"),
            None => bail!("homework #{index}: missing expected key '{key}'"),
        }
    }

    Ok(serde_json::from_value(item)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_well_formed_response() {
        let report = check_response(json!({
            "homeworks": [{"homework_name": "hw1", "status": "approved", "id": 7}],
            "current_date": 1700000000
        }))
        .unwrap();
        assert_eq!(report.homeworks.len(), 1);
        assert_eq!(report.homeworks[0].homework_name, "hw1");
        assert_eq!(report.current_date, Some(1700000000));
    }

    #[test]
    fn empty_list_is_valid() {
        let report = check_response(json!({"homeworks": []})).unwrap();
        assert!(report.homeworks.is_empty());
        assert_eq!(report.current_date, None);
    }

    #[test]
    fn rejects_non_object() {
        let err = check_response(json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("must be an object"));
    }

    #[test]
    fn rejects_missing_homeworks() {
        let err = check_response(json!({"current_date": 1})).unwrap_err();
        assert!(err.to_string().contains("no 'homeworks'"));
    }

    #[test]
    fn rejects_homeworks_not_list() {
        let err = check_response(json!({"homeworks": {"a": 1}})).unwrap_err();
        assert!(err.to_string().contains("must be a list"));
    }

    #[test]
    fn names_missing_key_and_index() {
        let err = check_response(json!({
            "homeworks": [
                {"homework_name": "a", "status": "approved"},
                {"homework_name": "b"}
            ]
        }))
        .unwrap_err()
        .to_string();
        assert!(err.contains("#1"));
        assert!(err.contains("'status'"));
    }

    #[test]
    fn rejects_non_string_status() {
        let err = check_response(json!({
            "homeworks": [{"homework_name": "a", "status": 3}]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("must be a string"));
    }

    #[test]
    fn rejects_non_integer_current_date() {
        let err = check_response(json!({"homeworks": [], "current_date": "today"})).unwrap_err();
        assert!(err.to_string().contains("current_date"));
    }
}
