use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use fountain_core::{
    scene_heading_text, section_title, Conf, Document, HiddenElements, StructureContent,
    StructureSection,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// 完整语法树
    Json,
    /// 统计信息
    Summary,
    /// 章节/场景大纲
    Structure,
}

/// 解析 Fountain 剧本
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Fountain 文件
    file: PathBuf,

    /// JSON 格式的解析配置
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    hide_notes: bool,

    #[arg(long)]
    hide_synopsis: bool,

    #[arg(long)]
    hide_boneyard: bool,

    #[arg(long, value_enum, default_value_t = Format::Summary)]
    format: Format,
}

fn load_conf(path: Option<&PathBuf>) -> Result<Conf> {
    let Some(path) = path else {
        return Ok(Conf::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("读取配置失败: {}", path.display()))?;
    let conf = serde_json::from_str(&text)
        .with_context(|| format!("配置格式错误: {}", path.display()))?;
    Ok(conf)
}

fn write_summary(out: &mut impl Write, doc: &Document) -> Result<()> {
    let structure = doc.structure();
    writeln!(out, "标题页字段: {}", doc.title_page().len())?;
    writeln!(out, "元素数量: {}", doc.elements().len())?;
    writeln!(out, "场景数量: {}", structure.scene_count())?;
    writeln!(out, "片段数量: {}", structure.snippets.len())?;
    let characters: Vec<&str> = doc.all_characters().iter().map(String::as_str).collect();
    writeln!(out, "角色({}): {}", characters.len(), characters.join(", "))?;
    Ok(())
}

fn write_section(out: &mut impl Write, doc: &Document, section: &StructureSection, depth: usize) -> Result<()> {
    let indent = "  ".repeat(depth);
    let title = section
        .section
        .and_then(|i| doc.element(i))
        .map(|el| section_title(el, doc));
    let depth = match title {
        Some(title) => {
            writeln!(out, "{indent}# {title}")?;
            depth + 1
        }
        None => depth,
    };
    let indent = "  ".repeat(depth);

    for item in &section.content {
        match item {
            StructureContent::Section(child) => write_section(out, doc, child, depth)?,
            StructureContent::Scene(scene) => {
                let Some(heading) = scene.scene.and_then(|i| doc.element(i)) else { continue };
                writeln!(out, "{indent}{} ({})", scene_heading_text(heading, doc), scene.content.len())?;
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let conf = load_conf(args.config.as_ref())?;
    let script = fs::read_to_string(&args.file)
        .with_context(|| format!("读取文件失败: {}", args.file.display()))?;

    let mut doc = fountain_core::parse(&script, &conf)?;
    tracing::info!(file = %args.file.display(), elements = doc.elements().len(), "解析完成");

    let hidden = HiddenElements {
        hide_notes: args.hide_notes,
        hide_synopsis: args.hide_synopsis,
        hide_boneyard: args.hide_boneyard,
    };
    if !hidden.is_noop() {
        doc = doc.with_hidden_elements_removed(&hidden);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut out, &doc)?;
            writeln!(out)?;
        }
        Format::Summary => write_summary(&mut out, &doc)?,
        Format::Structure => {
            for section in &doc.structure().sections {
                write_section(&mut out, &doc, section, 0)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}
