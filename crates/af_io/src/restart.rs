// crates/af_io/src/restart.rs

//! 重启检查点
//!
//! 二进制格式（全部小端）：
//!
//! ```text
//! [魔数: 4 bytes] "AFCK"
//! [版本: u32]
//! [时间: f64]
//! [步数: u64]
//! [导出计数: u64]
//! [刚体数: u64]
//! [刚体状态: n * 8 * f64]  (cx, cy, cz, r, vx, vy, vz, omega)
//! [场长度: u64]
//! [守恒变量场: len * f64]  (当前时间层)
//! [CRC32: u32]
//! ```
//!
//! 写入走临时文件加原子重命名；读取先验证魔数、版本与 CRC32，再
//! 解析负载。场只持久化当前时间层，恢复时两个缓冲都由它播种。

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use af_domain::body::{Body, BodySet};
use af_physics::solver::Solver;
use glam::DVec3;

use crate::error::{IoError, IoResult};

/// 检查点格式版本
pub const RESTART_VERSION: u32 = 1;

/// 检查点魔数
const RESTART_MAGIC: &[u8; 4] = b"AFCK";

/// 重启检查点数据
#[derive(Debug, Clone)]
pub struct Restart {
    /// 格式版本
    pub version: u32,
    /// 模拟时间（归一化）
    pub time: f64,
    /// 已完成步数
    pub step: usize,
    /// 已导出次数
    pub output_count: usize,
    /// 刚体状态
    pub bodies: Vec<Body>,
    /// 当前时间层守恒变量场
    pub state: Vec<f64>,
}

impl Restart {
    /// 截取求解器当前状态
    pub fn capture(solver: &Solver) -> Self {
        Self {
            version: RESTART_VERSION,
            time: solver.time().current_time,
            step: solver.time().step_count,
            output_count: solver.time().output_count,
            bodies: solver.bodies().iter().copied().collect(),
            state: solver.current_state().to_vec(),
        }
    }

    /// 保存到文件（临时文件 + 原子重命名）
    pub fn save(&self, path: &Path) -> IoResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let temp_path = path.with_extension("afck.tmp");

        let mut data = Vec::with_capacity(48 + self.state.len() * 8);
        data.extend_from_slice(RESTART_MAGIC);
        data.extend_from_slice(&self.version.to_le_bytes());
        data.extend_from_slice(&self.time.to_le_bytes());
        data.extend_from_slice(&(self.step as u64).to_le_bytes());
        data.extend_from_slice(&(self.output_count as u64).to_le_bytes());

        data.extend_from_slice(&(self.bodies.len() as u64).to_le_bytes());
        for body in &self.bodies {
            for value in [
                body.center.x,
                body.center.y,
                body.center.z,
                body.radius,
                body.velocity.x,
                body.velocity.y,
                body.velocity.z,
                body.omega,
            ] {
                data.extend_from_slice(&value.to_le_bytes());
            }
        }

        data.extend_from_slice(&(self.state.len() as u64).to_le_bytes());
        for &value in &self.state {
            data.extend_from_slice(&value.to_le_bytes());
        }

        {
            let mut writer = BufWriter::new(File::create(&temp_path)?);
            writer.write_all(&data)?;
            writer.write_all(&crc32(&data).to_le_bytes())?;
            writer.flush()?;
        }
        std::fs::rename(&temp_path, path)?;
        tracing::debug!(path = %path.display(), bytes = data.len() + 4, "检查点已保存");
        Ok(())
    }

    /// 从文件加载
    pub fn load(path: &Path) -> IoResult<Self> {
        let mut all = Vec::new();
        File::open(path)?.read_to_end(&mut all)?;
        if all.len() < 44 {
            return Err(IoError::Corrupted("文件太小".into()));
        }

        let crc_offset = all.len() - 4;
        let data = &all[..crc_offset];
        let stored = u32::from_le_bytes(all[crc_offset..].try_into().unwrap());
        let computed = crc32(data);
        if stored != computed {
            return Err(IoError::Checksum {
                expected: stored,
                found: computed,
            });
        }

        let mut cursor = Cursor::new(data);
        if cursor.take(4)? != RESTART_MAGIC {
            return Err(IoError::Corrupted("魔数不匹配".into()));
        }
        let version = u32::from_le_bytes(cursor.take(4)?.try_into().unwrap());
        if version > RESTART_VERSION {
            return Err(IoError::Version {
                file: version,
                current: RESTART_VERSION,
            });
        }
        let time = cursor.f64()?;
        let step = cursor.u64()? as usize;
        let output_count = cursor.u64()? as usize;

        let n_bodies = cursor.u64()? as usize;
        let mut bodies = Vec::with_capacity(n_bodies);
        for _ in 0..n_bodies {
            let mut values = [0.0; 8];
            for value in &mut values {
                *value = cursor.f64()?;
            }
            bodies.push(Body {
                center: DVec3::new(values[0], values[1], values[2]),
                radius: values[3],
                velocity: DVec3::new(values[4], values[5], values[6]),
                omega: values[7],
            });
        }

        let state_len = cursor.u64()? as usize;
        let mut state = Vec::with_capacity(state_len);
        for _ in 0..state_len {
            state.push(cursor.f64()?);
        }

        Ok(Self {
            version,
            time,
            step,
            output_count,
            bodies,
            state,
        })
    }

    /// 把检查点写回求解器
    pub fn apply(&self, solver: &mut Solver) -> IoResult<()> {
        let expected = solver.current_state().len();
        if self.state.len() != expected {
            return Err(IoError::MeshMismatch {
                expected,
                found: self.state.len(),
            });
        }
        solver.set_bodies(BodySet::new(self.bodies.clone()));
        solver.restore(&self.state, self.step, self.time)?;
        solver.time_mut().output_count = self.output_count;
        tracing::info!(step = self.step, time = self.time, "已从检查点恢复");
        Ok(())
    }
}

/// 顺序读取的小端游标
struct Cursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn take(&mut self, n: usize) -> IoResult<&'a [u8]> {
        let data: &'a [u8] = self.data;
        if self.offset + n > data.len() {
            return Err(IoError::Corrupted(format!(
                "偏移 {} 处数据截断",
                self.offset
            )));
        }
        let out = &data[self.offset..self.offset + n];
        self.offset += n;
        Ok(out)
    }

    fn f64(&mut self) -> IoResult<f64> {
        Ok(f64::from_le_bytes(self.take(8)?.try_into().unwrap()))
    }

    fn u64(&mut self) -> IoResult<u64> {
        Ok(u64::from_le_bytes(self.take(8)?.try_into().unwrap()))
    }
}

/// CRC-32 (IEEE 802.3)，逐位反射实现
fn crc32(data: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ 0xEDB8_8320;
            } else {
                crc >>= 1;
            }
        }
    }
    !crc
}
