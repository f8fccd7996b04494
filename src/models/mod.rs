pub mod admins;
pub mod alumni;
pub mod contact_requests;
pub mod conversations;
pub mod messages;
pub mod users;

pub use admins::{AdminAuthRow, AdminRow};
pub use alumni::AlumniRow;
pub use contact_requests::ContactRequestRow;
pub use conversations::{ConversationRow, PendingConversationRow};
pub use messages::MessageRow;
pub use users::{MemberRow, PendingUserRow, UserAuthRow, UserDetailRow, UserListRow};
