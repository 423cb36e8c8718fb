//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter    | Implements   | Connects to                 |
//! |------------|--------------|-----------------------------|
//! | `lcd_text` | DisplayPort  | 16×2 character LCD / log    |
//! | `csv_log`  | StoragePort  | any `io::Write` (SD card)   |
//! | `time`     | Clock        | ESP32 system timer / host   |

pub mod csv_log;
pub mod lcd_text;
pub mod time;
