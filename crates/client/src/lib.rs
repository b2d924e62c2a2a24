//! Client core of the Dompet budgeting app: session, route gate, API client,
//! modal and list controllers. Front ends only render state kept here.
pub use api::{ApiClient, ProfileStatus, Resource, Timeouts};
pub use error::{ClientError, Result, StoreError, ValidationError};
pub use gate::{AuthState, GateDecision, Navigator, Route};
pub use list::{ListController, ListQuery, Page};
pub use modal::{Confirmation, FormDraft, ModalController, ModalHost, ReferenceOptions};
pub use report::{Export, ReportPeriod};
pub use session::{Identity, Session, decode_identity};
pub use wizard::{ResetStep, ResetWizard};

pub mod api;
pub mod error;
pub mod format;
pub mod forms;
pub mod gate;
pub mod list;
pub mod modal;
pub mod report;
pub mod session;
pub mod wizard;
