//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod error;
pub mod join_room;
pub mod leave_room;
pub mod relay_signal;
pub mod room_info;
pub mod send_chat;
pub mod session;
pub mod sweep;
pub mod update_media_state;

pub use error::{ChatError, JoinError, MediaStateError, SessionError};
pub use join_room::{JoinRoomCommand, JoinRoomUseCase, JoinedRoom};
pub use leave_room::{Departure, LeaveRoomUseCase};
pub use relay_signal::{RelayOutcome, RelaySignalUseCase};
pub use room_info::{RegistryStats, RoomInfoUseCase, RoomSnapshot};
pub use send_chat::SendChatUseCase;
pub use session::SessionContext;
pub use sweep::{SweepReport, SweepUseCase};
pub use update_media_state::UpdateMediaStateUseCase;
