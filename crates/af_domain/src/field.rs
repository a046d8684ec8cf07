// crates/af_domain/src/field.rs

//! 守恒变量场
//!
//! 每个节点存 5 个连续分量 `U = (rho, rho*u, rho*v, rho*w, rho*E)`。
//! 场持有两个时间层缓冲区：扫描读 n 层、写 n+1 层，步末交换两个
//! `Vec` 句柄。交换只移动所有权，花费 O(1)，从不拷贝字节。

/// 守恒变量分量数
pub const DIM_U: usize = 5;

/// 双时间层守恒变量场
///
/// 两个缓冲区是等长的独立分配，互不别名；这让扫描可以安全地把
/// 读缓冲共享给所有写分片。
#[derive(Debug)]
pub struct Field {
    /// 当前时间层（扫描的读侧）
    u: Vec<f64>,
    /// 新时间层（扫描的写侧）
    un: Vec<f64>,
}

impl Field {
    /// 创建全零场
    pub fn new(n_max: usize) -> Self {
        Self {
            u: vec![0.0; n_max * DIM_U],
            un: vec![0.0; n_max * DIM_U],
        }
    }

    /// 当前时间层
    #[inline]
    pub fn current(&self) -> &[f64] {
        &self.u
    }

    /// 当前时间层（可写，用于初始条件与边界条件）
    #[inline]
    pub fn current_mut(&mut self) -> &mut [f64] {
        &mut self.u
    }

    /// 同时借出读侧与写侧，供一次扫描使用
    #[inline]
    pub fn levels_mut(&mut self) -> (&[f64], &mut [f64]) {
        (&self.u, &mut self.un)
    }

    /// 交换两个时间层的句柄
    #[inline]
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.u, &mut self.un);
    }

    /// 读出一个节点的守恒状态
    #[inline]
    pub fn state(buf: &[f64], idx: usize) -> [f64; DIM_U] {
        let base = idx * DIM_U;
        [
            buf[base],
            buf[base + 1],
            buf[base + 2],
            buf[base + 3],
            buf[base + 4],
        ]
    }

    /// 写入一个节点的守恒状态
    #[inline]
    pub fn set_state(buf: &mut [f64], idx: usize, state: [f64; DIM_U]) {
        let base = idx * DIM_U;
        buf[base..base + DIM_U].copy_from_slice(&state);
    }

    /// 两个缓冲区的裸指针（测试交换语义用）
    pub fn buffer_ptrs(&self) -> (*const f64, *const f64) {
        (self.u.as_ptr(), self.un.as_ptr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_exchanges_handles() {
        let mut field = Field::new(8);
        field.current_mut()[0] = 1.5;
        let (p0, p1) = field.buffer_ptrs();

        field.swap();
        let (q0, q1) = field.buffer_ptrs();
        assert_eq!(q0, p1);
        assert_eq!(q1, p0);
        assert_eq!(field.current()[0], 0.0);

        // 交换两次回到初始指针，且数据未被拷贝
        field.swap();
        let (r0, r1) = field.buffer_ptrs();
        assert_eq!(r0, p0);
        assert_eq!(r1, p1);
        assert_eq!(field.current()[0], 1.5);
    }

    #[test]
    fn test_state_round_trip() {
        let mut field = Field::new(4);
        let state = [1.0, 0.1, 0.2, 0.3, 2.5];
        Field::set_state(field.current_mut(), 2, state);
        assert_eq!(Field::state(field.current(), 2), state);
        // 相邻节点不受影响
        assert_eq!(Field::state(field.current(), 1), [0.0; DIM_U]);
        assert_eq!(Field::state(field.current(), 3), [0.0; DIM_U]);
    }
}
