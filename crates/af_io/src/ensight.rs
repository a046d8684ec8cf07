// crates/af_io/src/ensight.rs

//! EnSight Gold 导出器
//!
//! 每次导出写出一组文件（basename 带五位步号 tag）：
//!
//! - `<tag>.case`: 单帧 case 描述
//! - `<tag>.geo`: 二进制 IJK 块几何，带 iblank 标记
//!   （1 = 参与显示的流体/幽灵节点，0 = 被屏蔽的固体与外部节点）
//! - `<tag>.{rho,u,v,w,p,T}`: 六个二进制标量场
//! - `<tag>.Vel`: 二进制速度向量场
//! - `<tag>.particle`: 文本粒子文件（刚体状态，重启用）
//!
//! 总控文件 `ensight.case` 持有全部时间值，每次导出整体重写。
//! 二进制记录遵循 EnSight C Binary 约定：80 字节字符记录、i32 与
//! f32 小端数据，节点按 i 最快的 IJK 次序排列。

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use af_domain::field::Field;
use af_domain::partition::Region;
use af_physics::solver::Solver;
use af_physics::thermo::{pressure, temperature};

use crate::error::IoResult;

/// 标量文件后缀，与变量名一致
const SCALAR_NAMES: [&str; 6] = ["rho", "u", "v", "w", "p", "T"];

/// EnSight Gold 导出器
#[derive(Debug)]
pub struct EnsightExporter {
    dir: PathBuf,
    base: String,
    time_values: Vec<f64>,
}

impl EnsightExporter {
    /// 创建导出器，输出目录不存在时自动建立
    pub fn new(dir: impl Into<PathBuf>) -> IoResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            base: "ensight".to_string(),
            time_values: Vec::new(),
        })
    }

    /// 当前帧的文件名 tag
    fn tag(&self, output_count: usize) -> String {
        format!("{}{:05}", self.base, output_count)
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// 导出一帧
    pub fn write_step(&mut self, solver: &Solver) -> IoResult<()> {
        let time = solver.time();
        let tag = self.tag(time.output_count);
        tracing::info!(tag = %tag, time = time.current_time, "写出场数据");

        self.write_case_file(&tag, solver)?;
        self.write_geometry_file(&tag, solver)?;
        self.write_variable_files(&tag, solver)?;
        self.write_particle_file(&tag, solver)?;

        self.time_values.push(time.current_time);
        self.write_transient_case_file()?;
        Ok(())
    }

    /// 单帧 case 文件
    fn write_case_file(&self, tag: &str, solver: &Solver) -> IoResult<()> {
        let time = solver.time();
        let mut w = BufWriter::new(File::create(self.path(&format!("{tag}.case")))?);
        writeln!(w, "FORMAT")?;
        writeln!(w, "type: ensight gold")?;
        writeln!(w)?;
        writeln!(w, "GEOMETRY")?;
        writeln!(w, "model:  {tag}.geo")?;
        writeln!(w)?;
        writeln!(w, "VARIABLE")?;
        writeln!(w, "constant per case:  Order {}", time.output_count)?;
        writeln!(w, "constant per case:  Time  {}", format_g6(time.current_time))?;
        writeln!(w, "constant per case:  Step  {}", time.step_count)?;
        for name in SCALAR_NAMES {
            writeln!(w, "scalar per node:    {name:<5} {tag}.{name}")?;
        }
        writeln!(w, "vector per node:    Vel   {tag}.Vel")?;
        w.flush()?;
        Ok(())
    }

    /// 总控 transient case 文件（整体重写）
    fn write_transient_case_file(&self) -> IoResult<()> {
        let mut w = BufWriter::new(File::create(self.path("ensight.case"))?);
        writeln!(w, "FORMAT")?;
        writeln!(w, "type: ensight gold")?;
        writeln!(w)?;
        writeln!(w, "GEOMETRY")?;
        writeln!(w, "model:            1       {}*****.geo", self.base)?;
        writeln!(w)?;
        writeln!(w, "VARIABLE")?;
        for name in SCALAR_NAMES {
            writeln!(
                w,
                "scalar per node:  1  {name:<4} {}*****.{name}",
                self.base
            )?;
        }
        writeln!(w, "vector per node:  1  Vel  {}*****.Vel", self.base)?;
        writeln!(w)?;
        writeln!(w, "TIME")?;
        writeln!(w, "time set:         1")?;
        writeln!(w, "number of steps:          {}", self.time_values.len())?;
        writeln!(w, "filename start number:    0")?;
        writeln!(w, "filename increment:       1")?;
        write!(w, "time values:  ")?;
        for (n, t) in self.time_values.iter().enumerate() {
            if n > 0 && n % 5 == 0 {
                writeln!(w)?;
            }
            write!(w, "{} ", format_g6(*t))?;
        }
        writeln!(w)?;
        w.flush()?;
        Ok(())
    }

    /// 二进制几何文件
    fn write_geometry_file(&self, tag: &str, solver: &Solver) -> IoResult<()> {
        let space = solver.space();
        let part: &Region = solver.partition().entire();
        let mut w = BufWriter::new(File::create(self.path(&format!("{tag}.geo")))?);

        write_cstr80(&mut w, "C Binary")?;
        write_cstr80(&mut w, "Ensight Geometry File")?;
        write_cstr80(&mut w, "Written by AeroFlux")?;
        write_cstr80(&mut w, "node id off")?;
        write_cstr80(&mut w, "element id off")?;

        write_cstr80(&mut w, "part")?;
        w.write_all(&1i32.to_le_bytes())?;
        write_cstr80(&mut w, "entire domain")?;
        write_cstr80(&mut w, "block iblanked")?;
        let counts = [
            (part.i_sup - part.i_sub) as i32,
            (part.j_sup - part.j_sub) as i32,
            (part.k_sup - part.k_sub) as i32,
        ];
        for count in counts {
            w.write_all(&count.to_le_bytes())?;
        }

        // 三个坐标分量按 IJK 次序逐个写出
        for _k in part.k_range() {
            for _j in part.j_range() {
                for i in part.i_range() {
                    w.write_all(&(space.x(i) as f32).to_le_bytes())?;
                }
            }
        }
        for _k in part.k_range() {
            for j in part.j_range() {
                for _i in part.i_range() {
                    w.write_all(&(space.y(j) as f32).to_le_bytes())?;
                }
            }
        }
        for k in part.k_range() {
            for _j in part.j_range() {
                for _i in part.i_range() {
                    w.write_all(&(space.z(k) as f32).to_le_bytes())?;
                }
            }
        }

        // iblank: 流体与幽灵节点为 1，固体与外部节点为 0
        for k in part.k_range() {
            for j in part.j_range() {
                for i in part.i_range() {
                    let blank = space.kind(space.idx(k, j, i)).iblank();
                    w.write_all(&blank.to_le_bytes())?;
                }
            }
        }
        w.flush()?;
        Ok(())
    }

    /// 二进制标量与向量场文件
    fn write_variable_files(&self, tag: &str, solver: &Solver) -> IoResult<()> {
        let space = solver.space();
        let model = solver.model();
        let part = solver.partition().entire();
        let buf = solver.current_state();

        for (dim, name) in SCALAR_NAMES.iter().enumerate() {
            let mut w = BufWriter::new(File::create(self.path(&format!("{tag}.{name}")))?);
            write_cstr80(&mut w, "scalar variable")?;
            write_cstr80(&mut w, "part")?;
            w.write_all(&1i32.to_le_bytes())?;
            write_cstr80(&mut w, "block")?;
            for k in part.k_range() {
                for j in part.j_range() {
                    for i in part.i_range() {
                        let u = Field::state(buf, space.idx(k, j, i));
                        let value = match dim {
                            0 => u[0],
                            1 => u[1] / u[0],
                            2 => u[2] / u[0],
                            3 => u[3] / u[0],
                            4 => pressure(model.gamma, &u),
                            _ => temperature(model.cv, &u),
                        };
                        w.write_all(&(value as f32).to_le_bytes())?;
                    }
                }
            }
            w.flush()?;
        }

        // 速度向量：u、v、w 三个分量按 IJK 次序依次写出
        let mut w = BufWriter::new(File::create(self.path(&format!("{tag}.Vel")))?);
        write_cstr80(&mut w, "vector variable")?;
        write_cstr80(&mut w, "part")?;
        w.write_all(&1i32.to_le_bytes())?;
        write_cstr80(&mut w, "block")?;
        for dim in 1..4 {
            for k in part.k_range() {
                for j in part.j_range() {
                    for i in part.i_range() {
                        let u = Field::state(buf, space.idx(k, j, i));
                        w.write_all(&((u[dim] / u[0]) as f32).to_le_bytes())?;
                    }
                }
            }
        }
        w.flush()?;
        Ok(())
    }

    /// 文本粒子文件：刚体状态，供重启读取
    ///
    /// 每行八个字段，均按 `%.6g` 写出。
    fn write_particle_file(&self, tag: &str, solver: &Solver) -> IoResult<()> {
        let bodies = solver.bodies();
        let mut w = BufWriter::new(File::create(self.path(&format!("{tag}.particle")))?);
        writeln!(w, "N: {}", bodies.len())?;
        for body in bodies.iter() {
            writeln!(
                w,
                "{}, {}, {}, {}, {}, {}, {}, {}",
                format_g6(body.center.x),
                format_g6(body.center.y),
                format_g6(body.center.z),
                format_g6(body.radius),
                format_g6(body.velocity.x),
                format_g6(body.velocity.y),
                format_g6(body.velocity.z),
                format_g6(body.omega),
            )?;
        }
        w.flush()?;
        Ok(())
    }
}

/// 写一条 80 字节的 EnSight 字符记录
fn write_cstr80<W: Write>(w: &mut W, s: &str) -> IoResult<()> {
    let mut record = [0u8; 80];
    let bytes = s.as_bytes();
    let len = bytes.len().min(79);
    record[..len].copy_from_slice(&bytes[..len]);
    w.write_all(&record)?;
    Ok(())
}

/// C printf `%.6g` 等价格式化
///
/// 6 位有效数字：十进制指数落在 [-4, 6) 用定点写法并去掉尾随零，
/// 否则用科学计数法（指数带符号、至少两位）。文本输出的全部数值
/// 字段沿用这一约定。
fn format_g6(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }
    // 先按 6 位有效数字舍入，再由舍入后的指数选择写法
    let sci = format!("{value:.5e}");
    let (mantissa, exp) = sci.split_once('e').unwrap();
    let exp: i32 = exp.parse().unwrap();
    if (-4..6).contains(&exp) {
        let prec = (5 - exp).max(0) as usize;
        let mut fixed = format!("{value:.prec$}");
        if fixed.contains('.') {
            fixed = fixed
                .trim_end_matches('0')
                .trim_end_matches('.')
                .to_string();
        }
        fixed
    } else {
        let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    }
}
