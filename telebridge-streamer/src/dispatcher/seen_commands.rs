use serde_json::{Map, Value};
use std::collections::{HashMap, VecDeque};
use telebridge_core::RobotCommand;

pub const SEEN_COMMANDS_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedOutcome {
    pub success: bool,
    pub message: String,
}

#[derive(Debug)]
struct Entry {
    command: String,
    params: Option<Map<String, Value>>,
    outcome: RecordedOutcome,
}

impl Entry {
    fn matches(&self, cmd: &RobotCommand) -> bool {
        self.command == cmd.command && self.params == cmd.params
    }
}

/// Последние обработанные `commandId` и их результаты. Старые вытесняются первыми.
/// Повтор засчитывается, только если совпали и id, и сама команда с параметрами.
#[derive(Debug)]
pub struct SeenCommands {
    capacity: usize,
    order: VecDeque<String>,
    entries: HashMap<String, Entry>,
}

impl SeenCommands {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            order: VecDeque::with_capacity(capacity),
            entries: HashMap::with_capacity(capacity),
        }
    }

    pub fn get(&self, cmd: &RobotCommand) -> Option<&RecordedOutcome> {
        let id = cmd.correlation_id()?;
        self.entries
            .get(id)
            .filter(|entry| entry.matches(cmd))
            .map(|entry| &entry.outcome)
    }

    /// Запомнить результат. Команда без `commandId` не запоминается.
    pub fn record(&mut self, cmd: &RobotCommand, outcome: RecordedOutcome) {
        let Some(id) = cmd.correlation_id() else {
            return;
        };
        let entry = Entry {
            command: cmd.command.clone(),
            params: cmd.params.clone(),
            outcome,
        };
        // Тот же id с другой командой перезаписывает запись на её месте в очереди
        if self.entries.insert(id.to_owned(), entry).is_some() {
            return;
        }
        self.order.push_back(id.to_owned());

        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for SeenCommands {
    fn default() -> Self {
        Self::with_capacity(SEEN_COMMANDS_CAPACITY)
    }
}
