//! Wire contract for the automation backend.
//!
//! Field names in this crate are the external contract and must not be
//! renamed. Optional numeric fields serialize as explicit `null` so that the
//! backend can tell "unlimited" apart from zero.

pub mod envelope;
pub mod knowledge;
pub mod payload;
pub mod record;
pub mod types;

pub use replyline_core::Platform;

pub mod prelude {
    pub use crate::envelope::{ApiEnvelope, Rejected};
    pub use crate::knowledge::{KnowledgeUploadRequest, KnowledgeUploadResponse};
    pub use crate::payload::{
        Attachment, ButtonType, CommentReplyPayload, CommentToDmPayload, DmKeywordPayload,
        QuickReplyContentType, QuickReplyWire, ReplyTemplateContent, SubmitPayload,
        TemplateMessage, UrlButtonWire,
    };
    pub use crate::record::{DeployedRuleRecord, KeywordsWire, WireConfig};
    pub use crate::types::{
        ActivationStatus, AutomationKind, DateWindow, HealthStatus, MatchType, ModelUsage,
        PostSelectionType, ReplyCountCondition, ReplyType, ScheduleType, TemplateType,
        TriggerType,
    };
    pub use crate::Platform;
}
