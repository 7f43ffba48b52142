//! The fixed-layout role base record at payload offset 0.
//!
//! Layout (407 bytes, packed, little-endian):
//!
//! | Offset | Size | Field |
//! |-------:|-----:|-------|
//! |      0 |    4 | `version` |
//! |      4 |  369 | [`RoleBaseInfo`] |
//! |    373 |    1 | `base_need_update` |
//! |    374 |    2 | `fight_skill_count` (declared) |
//! |    376 |    2 | `life_skill_count` (declared) |
//! |    378 |    1 | `task_count` (declared) |
//! |    379 |    2 | `item_count` |
//! |    381 |    2 | `state_count` |
//! |    383 |   24 | section offsets + `data_len` |
//!
//! The declared skill/task counts are informational.  Array lengths are
//! always derived from adjacent offsets (see [`crate::derived`]).

use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::error::DecodeError;
use crate::record::FixedRecord;

pub const NAME_FIELD_LEN: usize = 32;

/// Character attributes.  Nested inside [`RoleBaseRecord`] and flattened
/// only when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleBaseInfo {
    pub role_id: u32,
    #[serde(serialize_with = "crate::text::serialize_name")]
    pub role_name: [u8; NAME_FIELD_LEN],
    pub sex: u8,
    #[serde(serialize_with = "crate::text::serialize_name")]
    pub alias: [u8; NAME_FIELD_LEN],
    #[serde(serialize_with = "crate::text::serialize_name")]
    pub account: [u8; NAME_FIELD_LEN],
    pub last_faction: u8,
    pub cur_faction: u8,
    pub fight_mode: u8,
    pub use_revive: u8,
    pub is_exchanged: u8,
    pub pk_status: u8,
    pub add_faction_times: i32,
    pub sect_role: i32,
    pub group_code: i32,
    pub group_role: i32,
    pub revival_id: i32,
    pub revival_x: i32,
    pub revival_y: i32,
    pub sub_world_id: i32,
    pub sub_world_x: i32,
    pub sub_world_y: i32,
    #[serde(serialize_with = "crate::text::serialize_name")]
    pub primary_key: [u8; NAME_FIELD_LEN],
    pub box_money: i32,
    pub bag_money: i32,
    pub five_element: i32,
    pub camp: i32,
    pub role_level: u16,
    pub exp_high: i16,
    pub exp_low: i32,
    pub lead_level: i32,
    pub lead_exp: i32,
    pub live_exp: i32,
    pub strength: i32,
    pub dexterity: i32,
    pub vitality: i32,
    pub energy: i32,
    pub luck: i32,
    pub life_max: i32,
    pub stamina_max: i32,
    pub mana_max: i32,
    pub cur_life: i32,
    pub cur_stamina: i32,
    pub cur_mana: i32,
    pub pk_value: i32,
    pub left_prop_point: i32,
    pub left_skill_point: i32,
    pub left_life: i32,
    pub play_game_time: i32,
    pub armor_res: i16,
    pub weapon_res: i16,
    pub head_image: i16,
    pub sect_stat: i32,
    pub world_stat: i32,
    pub kill_people_number: i32,
    pub bit_flag: i32,
    pub tong_id: u32,
    pub repute: i32,
    pub vote_point: i32,
    pub last_logout_time: u32,
    pub physics_res: i16,
    pub cold_res: i16,
    pub poison_res: i16,
    pub lighting_res: i16,
    pub fire_res: i16,
    pub relive_time: i16,
    /// Storage box expansion bits: `0x01` box 1, `0x04` box 2, `0x10` box 3.
    pub ext_box: u8,
    pub box_password_param: u8,
    pub reserve13: u8,
    pub reserve14: u8,
    pub box_password: u32,
    pub catch_time_for_anti_bot: u32,
    pub refuse_login_count: u8,
    pub have_refuse_login: u8,
    pub is_exchange_server: u8,
    pub refuse_login_re2: u8,
    pub map_copy_index: i32,
    pub role_create_time: u32,
    pub data_trans_mark: u8,
    pub last_trans_life_level: u8,
    pub reserve72: u16,
    /// Where the extension chain starts, relative to the payload.
    pub ext_buff_offset: u32,
    pub reserve9: u32,
    pub reserve0: u32,
}

impl RoleBaseInfo {
    /// The 48-bit experience value split across `exp_high` and `exp_low`.
    pub fn experience(&self) -> i64 {
        ((self.exp_high as i64) << 32) | (self.exp_low as u32 as i64)
    }

    pub fn role_name(&self) -> String {
        crate::text::display_name(&self.role_name)
    }

    pub fn account(&self) -> String {
        crate::text::display_name(&self.account)
    }
}

impl FixedRecord for RoleBaseInfo {
    const SIZE: usize = 369;

    fn parse(cur: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            role_id: cur.read_u32()?,
            role_name: cur.read_array()?,
            sex: cur.read_u8()?,
            alias: cur.read_array()?,
            account: cur.read_array()?,
            last_faction: cur.read_u8()?,
            cur_faction: cur.read_u8()?,
            fight_mode: cur.read_u8()?,
            use_revive: cur.read_u8()?,
            is_exchanged: cur.read_u8()?,
            pk_status: cur.read_u8()?,
            add_faction_times: cur.read_i32()?,
            sect_role: cur.read_i32()?,
            group_code: cur.read_i32()?,
            group_role: cur.read_i32()?,
            revival_id: cur.read_i32()?,
            revival_x: cur.read_i32()?,
            revival_y: cur.read_i32()?,
            sub_world_id: cur.read_i32()?,
            sub_world_x: cur.read_i32()?,
            sub_world_y: cur.read_i32()?,
            primary_key: cur.read_array()?,
            box_money: cur.read_i32()?,
            bag_money: cur.read_i32()?,
            five_element: cur.read_i32()?,
            camp: cur.read_i32()?,
            role_level: cur.read_u16()?,
            exp_high: cur.read_i16()?,
            exp_low: cur.read_i32()?,
            lead_level: cur.read_i32()?,
            lead_exp: cur.read_i32()?,
            live_exp: cur.read_i32()?,
            strength: cur.read_i32()?,
            dexterity: cur.read_i32()?,
            vitality: cur.read_i32()?,
            energy: cur.read_i32()?,
            luck: cur.read_i32()?,
            life_max: cur.read_i32()?,
            stamina_max: cur.read_i32()?,
            mana_max: cur.read_i32()?,
            cur_life: cur.read_i32()?,
            cur_stamina: cur.read_i32()?,
            cur_mana: cur.read_i32()?,
            pk_value: cur.read_i32()?,
            left_prop_point: cur.read_i32()?,
            left_skill_point: cur.read_i32()?,
            left_life: cur.read_i32()?,
            play_game_time: cur.read_i32()?,
            armor_res: cur.read_i16()?,
            weapon_res: cur.read_i16()?,
            head_image: cur.read_i16()?,
            sect_stat: cur.read_i32()?,
            world_stat: cur.read_i32()?,
            kill_people_number: cur.read_i32()?,
            bit_flag: cur.read_i32()?,
            tong_id: cur.read_u32()?,
            repute: cur.read_i32()?,
            vote_point: cur.read_i32()?,
            last_logout_time: cur.read_u32()?,
            physics_res: cur.read_i16()?,
            cold_res: cur.read_i16()?,
            poison_res: cur.read_i16()?,
            lighting_res: cur.read_i16()?,
            fire_res: cur.read_i16()?,
            relive_time: cur.read_i16()?,
            ext_box: cur.read_u8()?,
            box_password_param: cur.read_u8()?,
            reserve13: cur.read_u8()?,
            reserve14: cur.read_u8()?,
            box_password: cur.read_u32()?,
            catch_time_for_anti_bot: cur.read_u32()?,
            refuse_login_count: cur.read_u8()?,
            have_refuse_login: cur.read_u8()?,
            is_exchange_server: cur.read_u8()?,
            refuse_login_re2: cur.read_u8()?,
            map_copy_index: cur.read_i32()?,
            role_create_time: cur.read_u32()?,
            data_trans_mark: cur.read_u8()?,
            last_trans_life_level: cur.read_u8()?,
            reserve72: cur.read_u16()?,
            ext_buff_offset: cur.read_u32()?,
            reserve9: cur.read_u32()?,
            reserve0: cur.read_u32()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleBaseRecord {
    pub version: u32,
    #[serde(flatten)]
    pub base_info: RoleBaseInfo,
    pub base_need_update: u8,
    pub fight_skill_count: i16,
    pub life_skill_count: i16,
    pub task_count: u8,
    pub item_count: i16,
    pub state_count: i16,
    pub task_offset: u32,
    pub life_skill_offset: u32,
    pub fight_skill_offset: u32,
    pub item_offset: u32,
    pub state_offset: u32,
    pub data_len: u32,
}

impl RoleBaseRecord {
    pub fn ext_buff_offset(&self) -> u32 {
        self.base_info.ext_buff_offset
    }
}

impl FixedRecord for RoleBaseRecord {
    const SIZE: usize = 407;

    fn parse(cur: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            version: cur.read_u32()?,
            base_info: RoleBaseInfo::read(cur)?,
            base_need_update: cur.read_u8()?,
            fight_skill_count: cur.read_i16()?,
            life_skill_count: cur.read_i16()?,
            task_count: cur.read_u8()?,
            item_count: cur.read_i16()?,
            state_count: cur.read_i16()?,
            task_offset: cur.read_u32()?,
            life_skill_offset: cur.read_u32()?,
            fight_skill_offset: cur.read_u32()?,
            item_offset: cur.read_u32()?,
            state_offset: cur.read_u32()?,
            data_len: cur.read_u32()?,
        })
    }
}

/// Read the base record at the cursor (always payload offset 0 in practice).
pub fn read_base(cur: &mut ByteCursor<'_>) -> Result<RoleBaseRecord, DecodeError> {
    RoleBaseRecord::read(cur)
}
