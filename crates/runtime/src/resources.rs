use foundation::handles::Handle;

/// Errors raised by [`GeometryRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceError {
    UnknownHandle(Handle),
    AlreadyReleased(Handle),
}

impl std::fmt::Display for ResourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceError::UnknownHandle(h) => write!(f, "unknown geometry handle {h}"),
            ResourceError::AlreadyReleased(h) => write!(f, "geometry {h} was already released"),
        }
    }
}

impl std::error::Error for ResourceError {}

#[derive(Debug, Clone)]
struct Slot<K> {
    generation: u32,
    live: Option<K>,
}

/// Ownership ledger for renderer-side geometry.
///
/// Every allocation yields a generational [`Handle`] that must be released
/// exactly once. Releasing twice, or releasing a handle from an older
/// generation of the same slot, is reported instead of silently ignored.
///
/// Ordering contract:
/// - [`GeometryRegistry::live`] yields handles in ascending slot order.
#[derive(Debug, Clone)]
pub struct GeometryRegistry<K> {
    slots: Vec<Slot<K>>,
    free: Vec<u32>,
    live_count: usize,
}

impl<K> Default for GeometryRegistry<K> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live_count: 0,
        }
    }
}

impl<K: Copy> GeometryRegistry<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, kind: K) -> Handle {
        self.live_count += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.live = Some(kind);
            return Handle::new(index, slot.generation);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            live: Some(kind),
        });
        Handle::new(index, 0)
    }

    /// Releases `handle`, returning what it held.
    pub fn release(&mut self, handle: Handle) -> Result<K, ResourceError> {
        let slot = self
            .slots
            .get_mut(handle.index() as usize)
            .ok_or(ResourceError::UnknownHandle(handle))?;
        if slot.generation != handle.generation() {
            return Err(ResourceError::AlreadyReleased(handle));
        }
        let kind = slot
            .live
            .take()
            .ok_or(ResourceError::AlreadyReleased(handle))?;
        self.free.push(handle.index());
        self.live_count -= 1;
        Ok(kind)
    }

    pub fn get(&self, handle: Handle) -> Option<K> {
        self.slots
            .get(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.live)
    }

    pub fn is_live(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    pub fn live_count(&self) -> usize {
        self.live_count
    }

    pub fn live(&self) -> Vec<(Handle, K)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.live.map(|k| (Handle::new(i as u32, slot.generation), k)))
            .collect()
    }
}
