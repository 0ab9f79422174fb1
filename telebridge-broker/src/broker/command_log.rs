use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};

pub const COMMAND_LOG_CAPACITY: usize = 100;

/// Откуда пришла команда.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandSource {
    Viewer,
    Api,
    ApiEmergency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    pub timestamp: u64,
    pub source: CommandSource,
}

/// Журнал последних команд робота. Старые вытесняются первыми.
#[derive(Debug)]
pub struct CommandLog {
    capacity: usize,
    records: VecDeque<CommandRecord>,
}

impl CommandLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, record: CommandRecord) {
        self.records.push_back(record);
        while self.records.len() > self.capacity {
            self.records.pop_front();
        }
    }

    /// Последние `limit` записей, от старых к новым.
    pub fn recent(&self, limit: usize) -> Vec<CommandRecord> {
        let skip = self.records.len().saturating_sub(limit);
        self.records.iter().skip(skip).cloned().collect()
    }

    /// Сколько раз встречалась каждая команда начиная с `since_ms`.
    pub fn breakdown_since(&self, since_ms: u64) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for record in self.records.iter().filter(|r| r.timestamp > since_ms) {
            *counts.entry(record.command.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for CommandLog {
    fn default() -> Self {
        Self::with_capacity(COMMAND_LOG_CAPACITY)
    }
}
