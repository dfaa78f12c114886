//! 事件记录（EventData）
//!
//! 定义传输层投递给泵的单条事件的标准形态：流内位点（offset）、
//! 序列号、入队时间与负载，并冗余携带应用属性便于处理器消费。
//!
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct EventData {
    /// 流内位点，由服务端在入队时赋值
    offset: String,
    /// 分区内单调递增的序列号
    sequence_number: i64,
    /// 事件入队时间
    enqueued_at: DateTime<Utc>,
    /// 事件负载
    body: Vec<u8>,
    /// 应用属性（冗余携带，便于处理器按需取用）
    #[builder(default)]
    properties: Value,
}

impl EventData {
    pub fn offset(&self) -> &str {
        &self.offset
    }

    pub fn sequence_number(&self) -> i64 {
        self.sequence_number
    }

    pub fn enqueued_at(&self) -> DateTime<Utc> {
        self.enqueued_at
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn properties(&self) -> &Value {
        &self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 测试构建器与取值方法
    #[test]
    fn test_event_data_builder() {
        let event = EventData::builder()
            .offset("100".to_string())
            .sequence_number(7)
            .enqueued_at(Utc::now())
            .body(b"payload".to_vec())
            .properties(serde_json::json!({"source": "test"}))
            .build();

        assert_eq!(event.offset(), "100");
        assert_eq!(event.sequence_number(), 7);
        assert_eq!(event.body(), b"payload");
        assert_eq!(event.properties()["source"], "test");
    }

    // 测试未显式设置应用属性时的默认值
    #[test]
    fn test_event_data_default_properties() {
        let event = EventData::builder()
            .offset("0".to_string())
            .sequence_number(0)
            .enqueued_at(Utc::now())
            .body(Vec::new())
            .build();

        assert!(event.properties().is_null());
    }
}
