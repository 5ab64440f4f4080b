//! Arena keys for panels and drawables.
//!
//! Every panel in a tree lives in a generational arena. Parent and root links
//! are stored as plain keys, so a stale key is detected instead of dangling.

slotmap::new_key_type! {
    /// Identifier of a panel inside a panel tree.
    ///
    /// Ids are generational: once a panel is destroyed its id never resolves
    /// again, even if the slot is reused.
    pub struct PanelId;
}

slotmap::new_key_type! {
    /// Opaque handle to a drawable owned by a [`Surface`](crate::Surface).
    pub struct DrawableHandle;
}

static_assertions::assert_impl_all!(PanelId: Copy, Send, Sync, std::hash::Hash, Eq);
static_assertions::assert_impl_all!(DrawableHandle: Copy, Send, Sync, std::hash::Hash, Eq);
