//! Byte-level builder for role payloads and `.bak` envelopes.
#![allow(dead_code)]

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use crc32fast::Hasher;

pub const BASE_SIZE: usize = 407;

// Payload offsets of the base record fields the builder fills in.
pub const OFF_ROLE_NAME:          usize = 8;
pub const OFF_ACCOUNT:            usize = 73;
pub const OFF_BAG_MONEY:          usize = 187;
pub const OFF_ROLE_LEVEL:         usize = 199;
pub const OFF_EXT_BUFF_OFFSET:    usize = 361;
pub const OFF_FIGHT_SKILL_COUNT:  usize = 374;
pub const OFF_LIFE_SKILL_COUNT:   usize = 376;
pub const OFF_TASK_COUNT:         usize = 378;
pub const OFF_ITEM_COUNT:         usize = 379;
pub const OFF_STATE_COUNT:        usize = 381;
pub const OFF_TASK_OFFSET:        usize = 383;
pub const OFF_LIFE_SKILL_OFFSET:  usize = 387;
pub const OFF_FIGHT_SKILL_OFFSET: usize = 391;
pub const OFF_ITEM_OFFSET:        usize = 395;
pub const OFF_STATE_OFFSET:       usize = 399;
pub const OFF_DATA_LEN:           usize = 403;

// ── Section encoders ─────────────────────────────────────────────────────────

pub fn skill(id: i16, level: i16, exp: u32) -> Vec<u8> {
    let mut v = Vec::with_capacity(8);
    v.write_i16::<LittleEndian>(id).unwrap();
    v.write_i16::<LittleEndian>(level).unwrap();
    v.write_u32::<LittleEndian>(exp).unwrap();
    v
}

pub fn task(id: i32, value: i32) -> Vec<u8> {
    let mut v = Vec::with_capacity(8);
    v.write_i32::<LittleEndian>(id).unwrap();
    v.write_i32::<LittleEndian>(value).unwrap();
    v
}

pub fn group_header(data_type: i32, data_count: i16, data_len: i32) -> Vec<u8> {
    let mut v = Vec::with_capacity(10);
    v.write_i32::<LittleEndian>(data_type).unwrap();
    v.write_i16::<LittleEndian>(data_count).unwrap();
    v.write_i32::<LittleEndian>(data_len).unwrap();
    v
}

pub fn item_standard(class_code: u32, level: i32) -> Vec<u8> {
    let mut v = Vec::with_capacity(64);
    v.write_u32::<LittleEndian>(class_code).unwrap();
    for field in [2, 3, level, 1, 5, 10, 20, 1, 100] {
        v.write_i32::<LittleEndian>(field).unwrap();
    }
    v.write_u32::<LittleEndian>(0xDEAD_BEEF).unwrap();
    v.write_i32::<LittleEndian>(7).unwrap();
    for lvl in 1..=6i16 {
        v.write_i16::<LittleEndian>(lvl).unwrap();
    }
    v.write_u32::<LittleEndian>(0).unwrap();
    v
}

pub fn item_lock_soul(lock_type: i32) -> Vec<u8> {
    let mut v = Vec::with_capacity(16);
    v.write_i32::<LittleEndian>(lock_type).unwrap();
    v.write_u32::<LittleEndian>(1_700_000_000).unwrap();
    for id in [11i16, 12, 13, 14] {
        v.write_i16::<LittleEndian>(id).unwrap();
    }
    v
}

pub fn item_bill(price: i32) -> Vec<u8> {
    let mut v = Vec::with_capacity(16);
    v.write_u32::<LittleEndian>(1_800_000_000).unwrap();
    v.write_i32::<LittleEndian>(1).unwrap();
    v.write_i32::<LittleEndian>(2).unwrap();
    v.write_i32::<LittleEndian>(price).unwrap();
    v
}

pub fn item_extend(first: i32) -> Vec<u8> {
    let mut v = Vec::with_capacity(32);
    for i in 0..8 {
        v.write_i32::<LittleEndian>(first + i).unwrap();
    }
    v
}

/// One item group: header plus `count` items carrying the sub-records `mask` selects.
pub fn item_group(mask: i32, count: i16) -> Vec<u8> {
    let mut body = Vec::new();
    for i in 0..count.max(0) as i32 {
        if mask & 0x1 != 0 { body.extend(item_standard(0x0001_0000 | (i as u32 + 1), i + 1)); }
        if mask & 0x2 != 0 { body.extend(item_lock_soul(i)); }
        if mask & 0x4 != 0 { body.extend(item_bill(100 * (i + 1))); }
        if mask & 0x8 != 0 { body.extend(item_extend(i * 10)); }
    }
    let mut v = group_header(mask, count, body.len() as i32);
    v.extend(body);
    v
}

/// A 33-byte state envelope with `window` copied to the front of the 32-byte area.
pub fn state_raw(state_type: u8, window: &[u8]) -> Vec<u8> {
    assert!(window.len() <= 32);
    let mut v = vec![0u8; 33];
    v[0] = state_type;
    v[1..1 + window.len()].copy_from_slice(window);
    v
}

pub fn state_skill(skill_id: i32, level: i32) -> Vec<u8> {
    let mut w = Vec::new();
    w.write_i32::<LittleEndian>(skill_id).unwrap();
    w.write_i32::<LittleEndian>(level).unwrap();
    w.write_i32::<LittleEndian>(600).unwrap();
    w.write_u32::<LittleEndian>(42).unwrap();
    state_raw(1, &w)
}

pub fn state_cd(skill_id: i32, end: u32) -> Vec<u8> {
    let mut w = Vec::new();
    w.write_i32::<LittleEndian>(skill_id).unwrap();
    w.write_u32::<LittleEndian>(end).unwrap();
    state_raw(2, &w)
}

pub fn state_title(title_id: i32) -> Vec<u8> {
    let mut w = Vec::new();
    w.write_i32::<LittleEndian>(title_id).unwrap();
    w.write_u32::<LittleEndian>(1).unwrap();
    w.write_u32::<LittleEndian>(2).unwrap();
    w.write_u8(1).unwrap();
    state_raw(5, &w)
}

/// Custom state: the envelope announces `body.len()`, then `body.len() + 1`
/// trailing bytes follow (the repeated type byte, then the body).
pub fn state_custom(custom_type: u8, body: &[u8]) -> Vec<u8> {
    let mut w = Vec::new();
    w.write_u8(custom_type).unwrap();
    w.write_u32::<LittleEndian>(body.len() as u32).unwrap();
    let mut v = state_raw(6, &w);
    v.push(custom_type);
    v.extend_from_slice(body);
    v
}

pub fn ext_block(kind: i32, payload: &[u8]) -> Vec<u8> {
    let mut v = group_header(kind << 16, 1, payload.len() as i32);
    v.extend_from_slice(payload);
    v
}

pub fn ext_base(honor: i32) -> Vec<u8> {
    let mut p = Vec::new();
    for f in [honor, 20, 3, 400, 0, 0, 0, 0] {
        p.write_i32::<LittleEndian>(f).unwrap();
    }
    ext_block(1, &p)
}

pub fn ext_trans_nimbus(level: i32, high: u32, low: u32) -> Vec<u8> {
    let mut p = Vec::new();
    p.write_i32::<LittleEndian>(level).unwrap();
    p.write_u32::<LittleEndian>(high).unwrap();
    p.write_u32::<LittleEndian>(low).unwrap();
    p.write_i32::<LittleEndian>(9).unwrap();
    ext_block(4, &p)
}

pub fn ext_break(level: i32) -> Vec<u8> {
    let mut p = Vec::new();
    p.write_i32::<LittleEndian>(level).unwrap();
    p.write_u32::<LittleEndian>(1).unwrap();
    p.write_u32::<LittleEndian>(2).unwrap();
    ext_block(5, &p)
}

// ── Whole payloads ───────────────────────────────────────────────────────────

pub fn crc(bytes: &[u8]) -> u32 {
    let mut h = Hasher::new();
    h.update(bytes);
    h.finalize()
}

pub fn patch_u32(payload: &mut [u8], offset: usize, value: u32) {
    LittleEndian::write_u32(&mut payload[offset..offset + 4], value);
}

pub fn patch_i16(payload: &mut [u8], offset: usize, value: i16) {
    LittleEndian::write_i16(&mut payload[offset..offset + 2], value);
}

/// Recompute the trailing checksum after a patch.
pub fn reseal(payload: &mut [u8]) {
    let split = payload.len() - 4;
    let sum = crc(&payload[..split]);
    patch_u32(payload, split, sum);
}

#[derive(Debug, Clone)]
pub struct RoleFixture {
    pub role_name:    &'static str,
    pub account:      &'static str,
    pub role_level:   u16,
    pub bag_money:    i32,
    pub fight_skills: Vec<(i16, i16, u32)>,
    pub life_skills:  Vec<(i16, i16, u32)>,
    pub tasks:        Vec<(i32, i32)>,
    /// `(mask, count)` per item group.
    pub item_groups:  Vec<(i32, i16)>,
    /// Defaults to the sum of the group counts.
    pub item_count:   Option<i16>,
    pub states:       Vec<Vec<u8>>,
    /// Bytes between the state list and the extension chain.
    pub ext_gap:      Vec<u8>,
    pub ext_blocks:   Vec<Vec<u8>>,
    pub corrupt_crc:  bool,
}

impl Default for RoleFixture {
    fn default() -> Self {
        Self {
            role_name:    "Wanderer",
            account:      "tester01",
            role_level:   90,
            bag_money:    12_345,
            fight_skills: Vec::new(),
            life_skills:  Vec::new(),
            tasks:        Vec::new(),
            item_groups:  Vec::new(),
            item_count:   None,
            states:       Vec::new(),
            ext_gap:      Vec::new(),
            ext_blocks:   Vec::new(),
            corrupt_crc:  false,
        }
    }
}

/// Offsets the builder wrote into the base record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub fight_skill_offset: usize,
    pub life_skill_offset:  usize,
    pub task_offset:        usize,
    pub item_offset:        usize,
    pub state_offset:       usize,
    pub ext_offset:         usize,
    pub crc_offset:         usize,
}

impl RoleFixture {
    /// A role with something in every section.
    pub fn populated() -> Self {
        Self {
            fight_skills: vec![(101, 10, 5000), (102, 7, 0), (250, 1, 12)],
            life_skills:  vec![(1, 3, 300)],
            tasks:        vec![(1000, 1), (1001, -1), (2048, 77)],
            item_groups:  vec![(0b0001, 2), (0b0101, 1)],
            states:       vec![
                state_skill(501, 3),
                state_cd(502, 1_900_000_000),
                state_custom(1, &[2, 0xAA, 0xBB, 0xCC]),
                state_title(88),
            ],
            ext_blocks:   vec![
                ext_base(1200),
                ext_block(0, &[]),
                ext_trans_nimbus(2, 1, 5),
                ext_break(4),
            ],
            ..Self::default()
        }
    }

    pub fn build_payload(&self) -> (Vec<u8>, Layout) {
        let mut sections = Vec::new();

        let fight_skill_offset = BASE_SIZE;
        for &(id, lvl, exp) in &self.fight_skills { sections.extend(skill(id, lvl, exp)); }
        let life_skill_offset = BASE_SIZE + sections.len();
        for &(id, lvl, exp) in &self.life_skills { sections.extend(skill(id, lvl, exp)); }
        let task_offset = BASE_SIZE + sections.len();
        for &(id, value) in &self.tasks { sections.extend(task(id, value)); }
        let item_offset = BASE_SIZE + sections.len();
        for &(mask, count) in &self.item_groups { sections.extend(item_group(mask, count)); }
        let state_offset = BASE_SIZE + sections.len();
        for s in &self.states { sections.extend_from_slice(s); }
        sections.extend_from_slice(&self.ext_gap);
        let ext_offset = BASE_SIZE + sections.len();
        for b in &self.ext_blocks { sections.extend_from_slice(b); }
        let crc_offset = BASE_SIZE + sections.len();

        let mut payload = vec![0u8; BASE_SIZE];
        payload[..4].copy_from_slice(&3u32.to_le_bytes());
        write_name(&mut payload, OFF_ROLE_NAME, self.role_name);
        write_name(&mut payload, OFF_ACCOUNT, self.account);
        LittleEndian::write_i32(&mut payload[OFF_BAG_MONEY..], self.bag_money);
        LittleEndian::write_u16(&mut payload[OFF_ROLE_LEVEL..], self.role_level);
        patch_u32(&mut payload, OFF_EXT_BUFF_OFFSET, ext_offset as u32);
        patch_i16(&mut payload, OFF_FIGHT_SKILL_COUNT, self.fight_skills.len() as i16);
        patch_i16(&mut payload, OFF_LIFE_SKILL_COUNT, self.life_skills.len() as i16);
        payload[OFF_TASK_COUNT] = self.tasks.len() as u8;
        let item_total = self.item_groups.iter().map(|&(_, n)| n).sum::<i16>();
        patch_i16(&mut payload, OFF_ITEM_COUNT, self.item_count.unwrap_or(item_total));
        patch_i16(&mut payload, OFF_STATE_COUNT, self.states.len() as i16);
        patch_u32(&mut payload, OFF_TASK_OFFSET, task_offset as u32);
        patch_u32(&mut payload, OFF_LIFE_SKILL_OFFSET, life_skill_offset as u32);
        patch_u32(&mut payload, OFF_FIGHT_SKILL_OFFSET, fight_skill_offset as u32);
        patch_u32(&mut payload, OFF_ITEM_OFFSET, item_offset as u32);
        patch_u32(&mut payload, OFF_STATE_OFFSET, state_offset as u32);
        patch_u32(&mut payload, OFF_DATA_LEN, (crc_offset + 4) as u32);

        payload.extend(sections);
        let sum = crc(&payload);
        payload.write_u32::<LittleEndian>(if self.corrupt_crc { !sum } else { sum }).unwrap();

        let layout = Layout {
            fight_skill_offset,
            life_skill_offset,
            task_offset,
            item_offset,
            state_offset,
            ext_offset,
            crc_offset,
        };
        (payload, layout)
    }

    pub fn payload(&self) -> Vec<u8> {
        self.build_payload().0
    }

    pub fn bak(&self) -> Vec<u8> {
        bak(self.role_name.as_bytes(), &self.payload())
    }
}

fn write_name(payload: &mut [u8], offset: usize, name: &str) {
    let bytes = name.as_bytes();
    assert!(bytes.len() < 32);
    payload[offset..offset + bytes.len()].copy_from_slice(bytes);
}

/// `u32 name_len | name | u32 payload_len | payload`.
pub fn bak(name: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::with_capacity(8 + name.len() + payload.len());
    v.write_u32::<LittleEndian>(name.len() as u32).unwrap();
    v.extend_from_slice(name);
    v.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
    v.extend_from_slice(payload);
    v
}
