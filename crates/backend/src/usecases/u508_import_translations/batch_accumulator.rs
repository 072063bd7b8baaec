use contracts::usecases::u508_import_translations::LabelOperation;
use std::collections::VecDeque;

/// Размер пакета по умолчанию
pub const DEFAULT_BATCH_SIZE: usize = 5;

pub type Batch = Vec<LabelOperation>;

/// Очередь пакетов на отправку (FIFO)
pub type PendingQueue = VecDeque<Batch>;

/// Группирует поток операций в пакеты фиксированного размера
pub struct BatchAccumulator {
    max_batch_size: usize,
    current: Batch,
    queue: PendingQueue,
}

impl BatchAccumulator {
    pub fn new(max_batch_size: usize) -> Self {
        let max_batch_size = max_batch_size.max(1);
        Self {
            max_batch_size,
            current: Vec::with_capacity(max_batch_size),
            queue: VecDeque::new(),
        }
    }

    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Добавить операцию; заполненный пакет уходит в очередь
    pub fn add(&mut self, op: LabelOperation) {
        self.current.push(op);
        if self.current.len() >= self.max_batch_size {
            let full = std::mem::replace(
                &mut self.current,
                Vec::with_capacity(self.max_batch_size),
            );
            self.queue.push_back(full);
        }
    }

    /// Забрать очередь вместе с последним неполным пакетом.
    /// Пустой последний пакет в очередь не попадает.
    pub fn flush(mut self) -> PendingQueue {
        if !self.current.is_empty() {
            self.queue.push_back(self.current);
        }
        self.queue
    }
}

impl Default for BatchAccumulator {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl Extend<LabelOperation> for BatchAccumulator {
    fn extend<T: IntoIterator<Item = LabelOperation>>(&mut self, iter: T) {
        for op in iter {
            self.add(op);
        }
    }
}
