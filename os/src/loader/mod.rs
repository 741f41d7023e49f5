//! 进程映像加载器
//!
//! 映像文件为文本格式：
//!
//! ```text
//! <image_size> <instruction_count>
//! M 0 5
//! A 1 0 0
//! ...
//! ```
//!
//! 第 `i` 条指令以 NUL 结尾存放在虚拟地址 `i * INSTRUCTION_SIZE`，
//! 指令区之后直到 `image_size` 为可写数据区。指令行前后的空白和空行被忽略，
//! 声明条数之后的多余行不读取。

use crate::config::MAX_IMAGE_SIZE;
use core::fmt;
use mm::{PagingResult, ProcessImage};
use std::io;
use std::path::{Path, PathBuf};

/// 解析后的进程映像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramImage {
    /// 映像总大小
    pub size: usize,
    /// 指令条数
    pub instruction_count: usize,
    /// 指令区字节，长度为 `instruction_count * instruction_size`
    pub text: Vec<u8>,
}

impl ProgramImage {
    /// 转换为内存管理使用的映像
    pub fn into_process_image(self) -> PagingResult<ProcessImage> {
        ProcessImage::new(self.size, self.text)
    }
}

/// 映像加载错误
#[derive(Debug)]
pub enum LoadError {
    /// 文件无法读取
    Io {
        /// 文件路径
        path: PathBuf,
        /// 原始错误
        source: io::Error,
    },
    /// 首行格式错误
    Header {
        /// 首行内容
        line: String,
    },
    /// 指令行不足
    MissingInstruction {
        /// 缺失的指令序号
        index: usize,
        /// 声明的条数
        declared: usize,
    },
    /// 指令放不进一个指令槽
    InstructionTooLong {
        /// 指令序号
        index: usize,
        /// 指令长度
        len: usize,
        /// 指令槽可容纳的最大长度
        max: usize,
    },
    /// 声明的映像大小超过上限
    ImageTooLarge {
        /// 声明的大小
        size: usize,
        /// 上限
        max: usize,
    },
    /// 指令区超出声明的映像大小
    ImageTooSmall {
        /// 声明的大小
        size: usize,
        /// 指令区需要的大小
        required: usize,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "failed to open file: {}: {}", path.display(), source)
            }
            LoadError::Header { line } => {
                write!(f, "malformed header {line:?}, expected `<size> <count>`")
            }
            LoadError::MissingInstruction { index, declared } => {
                write!(f, "instruction {index} missing ({declared} declared)")
            }
            LoadError::InstructionTooLong { index, len, max } => {
                write!(f, "instruction {index} is {len} bytes, limit is {max}")
            }
            LoadError::ImageTooLarge { size, max } => {
                write!(f, "image size {size} exceeds the limit of {max} bytes")
            }
            LoadError::ImageTooSmall { size, required } => write!(
                f,
                "instructions need {required} bytes but image size is {size}"
            ),
        }
    }
}

impl std::error::Error for LoadError {}

/// 读取并解析映像文件
pub fn load_image(path: &Path, instruction_size: usize) -> Result<ProgramImage, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_image(&text, instruction_size)
}

/// 解析映像文本
pub fn parse_image(text: &str, instruction_size: usize) -> Result<ProgramImage, LoadError> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

    let header = lines.next().unwrap_or_default();
    let (size, instruction_count) = parse_header(header).ok_or_else(|| LoadError::Header {
        line: header.to_string(),
    })?;
    if size > MAX_IMAGE_SIZE {
        return Err(LoadError::ImageTooLarge {
            size,
            max: MAX_IMAGE_SIZE,
        });
    }

    let required = instruction_count
        .checked_mul(instruction_size)
        .ok_or(LoadError::ImageTooSmall {
            size,
            required: usize::MAX,
        })?;
    if required > size {
        return Err(LoadError::ImageTooSmall { size, required });
    }

    let max = instruction_size.saturating_sub(1);
    let mut image = vec![0u8; required];
    for index in 0..instruction_count {
        let inst = lines.next().ok_or(LoadError::MissingInstruction {
            index,
            declared: instruction_count,
        })?;
        if inst.len() > max {
            return Err(LoadError::InstructionTooLong {
                index,
                len: inst.len(),
                max,
            });
        }
        let start = index * instruction_size;
        image[start..start + inst.len()].copy_from_slice(inst.as_bytes());
    }

    Ok(ProgramImage {
        size,
        instruction_count,
        text: image,
    })
}

fn parse_header(line: &str) -> Option<(usize, usize)> {
    let mut fields = line.split_whitespace();
    let size = fields.next()?.parse().ok()?;
    let count = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some((size, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_support::image::ImageText;
    use test_support::pattern::instruction_slot;

    #[test]
    fn test_parse_places_instructions_in_slots() {
        let text = ImageText::new(64)
            .instruction("M 0 5")
            .instruction("A 1 0 0")
            .build();
        let image = parse_image(&text, 16).unwrap();
        assert_eq!(image.size, 64);
        assert_eq!(image.instruction_count, 2);
        assert_eq!(image.text.len(), 32);
        assert_eq!(&image.text[..16], instruction_slot("M 0 5", 16).as_slice());
        assert_eq!(&image.text[16..], instruction_slot("A 1 0 0", 16).as_slice());
    }

    #[test]
    fn test_blank_lines_and_padding_ignored() {
        let image = parse_image("  32 1 \n\n   M 2 7  \nextra\n", 16).unwrap();
        assert_eq!(image.instruction_count, 1);
        assert_eq!(&image.text[..6], b"M 2 7\0");
    }

    #[test]
    fn test_header_errors() {
        assert!(matches!(parse_image("", 16), Err(LoadError::Header { .. })));
        assert!(matches!(
            parse_image("64\nM 0 1\n", 16),
            Err(LoadError::Header { .. })
        ));
        assert!(matches!(
            parse_image("64 x\n", 16),
            Err(LoadError::Header { .. })
        ));
    }

    #[test]
    fn test_missing_instruction() {
        let text = ImageText::new(64).moves(0, 2).declare_count(3).build();
        assert!(matches!(
            parse_image(&text, 16),
            Err(LoadError::MissingInstruction {
                index: 2,
                declared: 3
            })
        ));
    }

    #[test]
    fn test_instruction_too_long() {
        let text = ImageText::new(64).instruction("M 0 123456789012").build();
        assert!(matches!(
            parse_image(&text, 16),
            Err(LoadError::InstructionTooLong {
                index: 0,
                len: 16,
                max: 15
            })
        ));
    }

    #[test]
    fn test_image_too_small() {
        let text = ImageText::new(40).moves(0, 3).build();
        assert!(matches!(
            parse_image(&text, 16),
            Err(LoadError::ImageTooSmall {
                size: 40,
                required: 48
            })
        ));
    }

    #[test]
    fn test_image_too_large() {
        let err = parse_image("18446744073709551615 1\nM 0 1\n", 16).unwrap_err();
        assert!(matches!(
            err,
            LoadError::ImageTooLarge {
                size: usize::MAX,
                max: MAX_IMAGE_SIZE
            }
        ));
        assert!(err.to_string().contains("exceeds"));
        // 上限本身仍可装载
        let text = format!("{MAX_IMAGE_SIZE} 1\nM 0 1\n");
        assert_eq!(parse_image(&text, 16).unwrap().size, MAX_IMAGE_SIZE);
    }

    #[test]
    fn test_missing_file() {
        let err = load_image(Path::new("/nonexistent/vmsim.img"), 16).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().starts_with("failed to open file"));
    }
}
