//! Chronologically sortable keys for records created through `POST`.
//!
//! A key is 8 characters of millisecond timestamp followed by 12 random
//! characters, all drawn from a 64-symbol alphabet whose ASCII order matches
//! its digit value. Keys minted later therefore sort after earlier ones, which
//! keeps a `BTreeMap` of records in creation order.

use chrono::Utc;
use rand::Rng;

const PUSH_CHARS: &[u8; 64] = b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

pub const KEY_LEN: usize = 20;
const TIME_LEN: usize = 8;
const RANDOM_LEN: usize = KEY_LEN - TIME_LEN;

#[derive(Debug, Default)]
pub struct PushKeyGenerator {
    last_millis: i64,
    last_random: [u8; RANDOM_LEN],
}

impl PushKeyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_key(&mut self) -> String {
        self.next_key_at(Utc::now().timestamp_millis())
    }

    /// Mints a key for the given instant. A clock that steps backwards is
    /// pinned to the last instant seen so ordering still holds.
    pub fn next_key_at(&mut self, millis: i64) -> String {
        let millis = millis.max(self.last_millis).max(0);
        if millis == self.last_millis {
            self.increment_random();
        } else {
            let mut rng = rand::rng();
            for digit in self.last_random.iter_mut() {
                *digit = rng.random_range(0..64);
            }
        }
        self.last_millis = millis;

        let mut key = String::with_capacity(KEY_LEN);
        let mut time_chars = [0u8; TIME_LEN];
        let mut remaining = millis;
        for slot in time_chars.iter_mut().rev() {
            *slot = PUSH_CHARS[(remaining % 64) as usize];
            remaining /= 64;
        }
        key.extend(time_chars.iter().map(|c| *c as char));
        key.extend(
            self.last_random
                .iter()
                .map(|digit| PUSH_CHARS[*digit as usize] as char),
        );
        key
    }

    fn increment_random(&mut self) {
        for digit in self.last_random.iter_mut().rev() {
            if *digit == 63 {
                *digit = 0;
            } else {
                *digit += 1;
                break;
            }
        }
    }
}
