use crate::ids::ToastId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ToastKind {
    Success,
    Error,
    #[default]
    Info,
    Warning,
}

/// Transient notification. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub kind: ToastKind,
    pub visible: bool,
}
