use crate::logger;
use crate::objects::object::Object;

macro_rules! grow_capacity {
    ($capacity:expr) => {{
        if $capacity < 8 {
            8
        } else {
            $capacity * 2
        }
    }};
}
pub(crate) use grow_capacity;

pub const GC_HEAP_GROW_FACTOR: usize = 2;
pub const GC_FIRST_THRESHOLD: usize = 1024 * 1024;

/// Construction-time knobs for the VM; resolved once and stored on the
/// allocator, which is where every collection decision is made.
#[derive(Debug, Clone)]
pub struct VmConfig {
    pub gc_enabled: bool,
    pub log_gc: bool,
    pub stress_gc: bool,
    pub heap_grow_factor: usize,
    pub first_gc_threshold: usize,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            gc_enabled: true,
            log_gc: false,
            stress_gc: false,
            heap_grow_factor: GC_HEAP_GROW_FACTOR,
            first_gc_threshold: GC_FIRST_THRESHOLD,
        }
    }
}

pub struct MemoryAllocator {
    pub bytes_allocated: usize,
    pub next_gc: usize,
    pub gc_enabled: bool,
    pub log_gc: bool,
    pub stress_gc: bool,
    pub heap_grow_factor: usize,
    // Transient root for an object that has been allocated but not yet
    // stored anywhere the collector can see.
    pub protected_object: *mut Object,
}

impl MemoryAllocator {
    pub fn new(config: &VmConfig) -> Self {
        MemoryAllocator {
            bytes_allocated: 0,
            next_gc: config.first_gc_threshold,
            gc_enabled: config.gc_enabled,
            log_gc: config.log_gc,
            stress_gc: config.stress_gc,
            heap_grow_factor: config.heap_grow_factor,
            protected_object: std::ptr::null_mut(),
        }
    }

    pub fn record_allocation(&mut self, bytes: usize) {
        self.bytes_allocated += bytes;
    }

    pub fn record_free(&mut self, bytes: usize) {
        self.bytes_allocated = self.bytes_allocated.saturating_sub(bytes);
    }

    pub fn should_collect(&self) -> bool {
        if !self.gc_enabled {
            return false;
        }
        self.stress_gc || self.bytes_allocated > self.next_gc
    }

    /// Reschedule the next collection after a completed cycle.
    pub fn update_threshold(&mut self) {
        self.next_gc = self.bytes_allocated * self.heap_grow_factor;
        if self.log_gc {
            logger::debug(&format!("next gc at {} bytes", self.next_gc));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grow_capacity_starts_at_eight() {
        assert_eq!(grow_capacity!(0), 8);
        assert_eq!(grow_capacity!(7), 8);
        assert_eq!(grow_capacity!(8), 16);
        assert_eq!(grow_capacity!(32), 64);
    }

    #[test]
    fn stress_mode_always_wants_collection() {
        let config = VmConfig {
            stress_gc: true,
            ..Default::default()
        };
        let allocator = MemoryAllocator::new(&config);
        assert!(allocator.should_collect());
    }

    #[test]
    fn threshold_gates_collection() {
        let mut allocator = MemoryAllocator::new(&VmConfig::default());
        assert!(!allocator.should_collect());
        allocator.record_allocation(GC_FIRST_THRESHOLD + 1);
        assert!(allocator.should_collect());
        allocator.record_free(GC_FIRST_THRESHOLD);
        assert!(!allocator.should_collect());
    }

    #[test]
    fn disabled_gc_never_collects() {
        let config = VmConfig {
            gc_enabled: false,
            stress_gc: true,
            ..Default::default()
        };
        let mut allocator = MemoryAllocator::new(&config);
        allocator.record_allocation(usize::MAX / 2);
        assert!(!allocator.should_collect());
    }

    #[test]
    fn freeing_more_than_allocated_saturates() {
        let mut allocator = MemoryAllocator::new(&VmConfig::default());
        allocator.record_allocation(100);
        allocator.record_free(250);
        assert_eq!(allocator.bytes_allocated, 0);
    }
}
