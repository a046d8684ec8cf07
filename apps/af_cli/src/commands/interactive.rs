// apps/af_cli/src/commands/interactive.rs

//! 交互模式
//!
//! 简单的标准输入循环，把输入分派到对应的子命令实现。

use anyhow::Result;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use super::{postprocess, preprocess, run};

const HELP: &str = "\
可用命令:
  run <case> [output]            运行求解
  preprocess <case> [output]     预处理并导出第 0 帧
  postprocess <case> <restart>   从检查点恢复并导出
  help                           显示本帮助
  exit                           退出";

/// 执行交互模式
pub fn execute() -> Result<()> {
    println!("AeroFlux 交互模式，输入 help 查看命令。");
    let stdin = std::io::stdin();
    let mut line = String::new();

    loop {
        print!("af> ");
        std::io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let result = match tokens.as_slice() {
            [] => Ok(()),
            ["help"] => {
                println!("{HELP}");
                Ok(())
            }
            ["exit"] | ["quit"] => break,
            ["run", case, rest @ ..] => run::execute(run::RunArgs {
                case: PathBuf::from(case),
                output: PathBuf::from(rest.first().copied().unwrap_or("output")),
                restart: None,
            }),
            ["preprocess", case, rest @ ..] => {
                preprocess::execute(preprocess::PreprocessArgs {
                    case: PathBuf::from(case),
                    output: PathBuf::from(rest.first().copied().unwrap_or("output")),
                })
            }
            ["postprocess", case, restart] => {
                postprocess::execute(postprocess::PostprocessArgs {
                    case: PathBuf::from(case),
                    restart: PathBuf::from(restart),
                    output: PathBuf::from("postprocess"),
                })
            }
            _ => {
                println!("无法识别的命令，输入 help 查看用法。");
                Ok(())
            }
        };
        if let Err(e) = result {
            eprintln!("命令失败: {e:#}");
        }
    }
    Ok(())
}
