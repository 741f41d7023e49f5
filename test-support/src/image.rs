//! 进程映像文本构造器
//!
//! 生成模拟器加载器接受的映像文本：首行 `<size> <instruction_count>`，
//! 之后每行一条指令。

/// 进程映像文本构造器
#[derive(Debug, Clone)]
pub struct ImageText {
    size: usize,
    instructions: Vec<String>,
    declared_count: Option<usize>,
}

impl ImageText {
    /// 以声明的映像大小（字节）创建构造器
    pub fn new(size: usize) -> Self {
        Self {
            size,
            instructions: Vec::new(),
            declared_count: None,
        }
    }

    /// 追加一条指令
    pub fn instruction(mut self, text: &str) -> Self {
        self.instructions.push(text.to_string());
        self
    }

    /// 追加 `count` 条 `M <reg> <i>` 形式的填充指令
    pub fn moves(mut self, reg: usize, count: usize) -> Self {
        for i in 0..count {
            self.instructions.push(format!("M {} {}", reg, i));
        }
        self
    }

    /// 覆盖首行声明的指令条数（用于构造格式错误的映像）
    pub fn declare_count(mut self, count: usize) -> Self {
        self.declared_count = Some(count);
        self
    }

    /// 已追加的指令条数
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// 是否没有任何指令
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// 生成映像文本
    pub fn build(&self) -> String {
        let count = self.declared_count.unwrap_or(self.instructions.len());
        let mut text = format!("{} {}\n", self.size, count);
        for inst in &self.instructions {
            text.push_str(inst);
            text.push('\n');
        }
        text
    }
}
