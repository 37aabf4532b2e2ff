//! Staff-side logic: HTTP transport, member cache, the member picker and the group form.

pub mod api;
pub mod form;
pub mod member_cache;
pub mod multi_select;

pub use api::{load_form_context, ClientError, FormContext, GroupApi, HttpGroupApi};
pub use form::{FormEffect, FormState, GroupForm, GroupFormValues, Notice, Outcome};
pub use member_cache::MemberCache;
pub use multi_select::{apply_event, MultiSelect, PopoverState, SelectionEvent};
