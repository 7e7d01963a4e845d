//! Row Factories - 결과 행 변환
//!
//! 실행 결과의 원시 GraphSON 행을 값으로 변환

use crate::graphson::{GraphSONReader, Traverser, Value};

use super::error::{GraphError, GraphResult};

/// 결과 행을 감싸는 필드 이름
pub const RESULT_FIELD: &str = "result";

// ============================================================================
// Row Factories
// ============================================================================

/// 행 하나를 디코딩하고 `{"result": x}` 래퍼를 벗김
fn decode_row(reader: &GraphSONReader<'_>, row: &str) -> GraphResult<Value> {
    let value = reader.read_object(row)?;
    match value {
        Value::Map(map) if map.len() == 1 => match map.get_str(RESULT_FIELD) {
            Some(result) => Ok(result.clone()),
            None => Ok(Value::Map(map)),
        },
        other => Ok(other),
    }
}

/// 디코딩된 값을 그대로 반환하는 행 팩토리
pub fn graph_traversal_row_factory(rows: &[String]) -> GraphResult<Vec<Value>> {
    let reader = GraphSONReader::new();
    let values = rows
        .iter()
        .map(|row| decode_row(&reader, row))
        .collect::<GraphResult<Vec<_>>>()?;
    tracing::debug!(rows = values.len(), "decoded graph rows");
    Ok(values)
}

/// 디코딩된 값을 트래버서로 반환하는 행 팩토리
///
/// 트래버서가 아닌 값은 bulk 1로 감쌈
pub fn graph_traversal_traverser_row_factory(rows: &[String]) -> GraphResult<Vec<Traverser>> {
    graph_traversal_row_factory(rows)?
        .into_iter()
        .map(|value| match value {
            Value::Traverser(t) if t.bulk < 1 => Err(GraphError::invalid_result(format!(
                "traverser bulk must be positive, got {}",
                t.bulk
            ))),
            Value::Traverser(t) => Ok(t),
            other => Ok(Traverser::new(other, 1)),
        })
        .collect()
}

// ============================================================================
// RowFactory - 행 팩토리 선택
// ============================================================================

/// 결과 형태 선택
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowFactory {
    /// 값 그대로
    #[default]
    Value,
    /// 트래버서 (값 + bulk)
    Traverser,
}

impl RowFactory {
    /// 원시 행에 적용
    pub fn apply(&self, rows: &[String]) -> GraphResult<Vec<Value>> {
        match self {
            RowFactory::Value => graph_traversal_row_factory(rows),
            RowFactory::Traverser => Ok(graph_traversal_traverser_row_factory(rows)?
                .into_iter()
                .map(Value::Traverser)
                .collect()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphson::GraphSONError;

    fn rows(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn test_value_row_factory() {
        let raw = rows(&[
            r#"{"result":{"@type":"g:Int32","@value":1}}"#,
            r#"{"result":"marko"}"#,
            r#"{"@type":"g:Int64","@value":5}"#,
        ]);
        let values = graph_traversal_row_factory(&raw).unwrap();
        assert_eq!(
            values,
            vec![Value::Int32(1), Value::from("marko"), Value::Int64(5)]
        );
    }

    #[test]
    fn test_traverser_row_factory() {
        let raw = rows(&[
            r#"{"result":{"@type":"g:Traverser","@value":{"value":"josh","bulk":{"@type":"g:Int64","@value":3}}}}"#,
            r#"{"result":"vadas"}"#,
        ]);
        let traversers = graph_traversal_traverser_row_factory(&raw).unwrap();
        assert_eq!(traversers[0], Traverser::new("josh", 3));
        assert_eq!(traversers[1], Traverser::new("vadas", 1));
    }

    #[test]
    fn test_row_factory_apply() {
        let raw = rows(&[r#"{"result":true}"#]);
        assert_eq!(RowFactory::Value.apply(&raw).unwrap(), vec![Value::Boolean(true)]);
        assert_eq!(
            RowFactory::Traverser.apply(&raw).unwrap(),
            vec![Value::Traverser(Traverser::new(true, 1))]
        );
    }

    #[test]
    fn test_decode_failure_propagates() {
        let raw = rows(&[r#"{"result":{"@type":"g:Bogus","@value":1}}"#]);
        let err = graph_traversal_row_factory(&raw).unwrap_err();
        assert!(matches!(
            err,
            GraphError::Codec(GraphSONError::UnknownTag(_))
        ));
    }

    #[test]
    fn test_non_positive_bulk_rejected() {
        let raw = rows(&[
            r#"{"result":{"@type":"g:Traverser","@value":{"value":1,"bulk":{"@type":"g:Int64","@value":0}}}}"#,
        ]);
        assert!(matches!(
            graph_traversal_traverser_row_factory(&raw),
            Err(GraphError::InvalidResult(_))
        ));
    }

    #[test]
    fn test_null_row_wrapped() {
        let raw = rows(&[r#"{"result":null}"#]);
        let traversers = graph_traversal_traverser_row_factory(&raw).unwrap();
        assert_eq!(traversers, vec![Traverser::new(Value::Null, 1)]);
    }
}
