//! ユーザー嗜好の学習
//!
//! - profile: 永続化されるプロファイルと関連型
//! - storage: キー/値ストレージ（ファイル・メモリ）
//! - store: 重みの更新と学習コンテキスト生成

pub mod profile;
pub mod storage;
pub mod store;

pub use profile::{BudgetPreference, FeedbackEvent, LearningLevel, PreferenceProfile, SummaryStats};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{PreferenceStore, STORAGE_KEY};
