// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - 列角色识别
// ==========================================
// 职责: 表头文本 → 语义角色; 识别尺码列
// 红线: 匹配表为只读静态配置, 函数无状态、无副作用
// ==========================================

use crate::domain::types::ColumnRole;
use crate::importer::data_cleaner::{normalize_header, normalize_size};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// ==========================================
// 角色匹配表（顺序即优先级, 先命中者胜出）
// ==========================================
// 模式作用于 normalize_header 之后的文本
const ROLE_PATTERNS: &[(ColumnRole, &[&str])] = &[
    (
        ColumnRole::FabricWeight,
        &[r"\bgsm\b", r"fabric weight", r"\bweight\b", r"वजन", r"जीएसएम"],
    ),
    (
        ColumnRole::Consumption,
        &[r"consumption", r"\bcons\b", r"\bavg\b", r"per (pc|piece|garment)", r"खपत"],
    ),
    (
        ColumnRole::Layers,
        &[r"\blayers?\b", r"\bplys?\b", r"\blay\b", r"परत", r"लेयर"],
    ),
    (
        ColumnRole::Pieces,
        &[
            r"\bpieces?\b",
            r"\bpcs\b",
            r"\bqty\b",
            r"\bquantity\b",
            r"\btotal\b",
            r"\bnos\b",
            r"पीस",
            r"मात्रा",
            r"कुल",
        ],
    ),
    (
        ColumnRole::Color,
        &[r"\bcolou?rs?\b", r"\bshades?\b", r"रंग", r"कलर"],
    ),
    (ColumnRole::SizeToken, &[r"\bsizes?\b", r"साइज", r"आकार"]),
    (ColumnRole::Lot, &[r"\blot\b", r"\blots\b", r"\bbatch\b", r"लॉट", r"बैच"]),
    (
        ColumnRole::Article,
        &[r"\barticle\b", r"\bstyle\b", r"\bart\b", r"\bitem\b", r"आर्टिकल", r"स्टाइल"],
    ),
    (
        ColumnRole::Buyer,
        &[r"\bbuyer\b", r"\bcustomer\b", r"\bclient\b", r"बायर", r"ग्राहक"],
    ),
    (ColumnRole::Order, &[r"\border\b", r"\bpo\b", r"ऑर्डर"]),
    (
        ColumnRole::Fabric,
        &[r"\bfabric\b", r"\bmaterial\b", r"\bcloth\b", r"कपड"],
    ),
    (ColumnRole::Date, &[r"\bdate\b", r"\bdt\b", r"तारीख", r"दिनांक"]),
    (ColumnRole::Shift, &[r"\bshift\b", r"शिफ्ट", r"पाली"]),
    (
        ColumnRole::Cutter,
        &[r"\bcutter\b", r"\bcut by\b", r"\bcutting master\b", r"कटर"],
    ),
];

static ROLE_REGEXES: Lazy<Vec<(ColumnRole, Vec<Regex>)>> = Lazy::new(|| {
    ROLE_PATTERNS
        .iter()
        .map(|(role, patterns)| {
            let regexes = patterns
                .iter()
                .map(|p| Regex::new(p).expect("Valid regex pattern"))
                .collect();
            (*role, regexes)
        })
        .collect()
});

// ==========================================
// 尺码词表（标准化后: 大写、仅字母数字）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeVocabulary {
    AdultAlpha,
    Numeric,
    Kids,
    AgeBanded,
    European,
}

const ADULT_ALPHA_SIZES: &[&str] = &[
    "XXS", "XS", "S", "M", "L", "XL", "XXL", "XXXL", "2XL", "3XL", "4XL", "5XL", "FREESIZE",
];

const KIDS_SIZES: &[&str] = &[
    "NB", "03M", "36M", "69M", "612M", "912M", "1218M", "1824M", "2T", "3T", "4T", "5T", "6T",
];

const AGE_BANDED_SIZES: &[&str] = &[
    "12Y", "23Y", "34Y", "45Y", "56Y", "67Y", "78Y", "89Y", "910Y", "1011Y", "1112Y", "1213Y",
    "1314Y", "1415Y", "2Y", "3Y", "4Y", "5Y", "6Y", "7Y", "8Y", "9Y", "10Y", "11Y", "13Y", "14Y",
];

static NUMERIC_SIZES: Lazy<Vec<String>> = Lazy::new(|| (22..=48).map(|n| n.to_string()).collect());

static EUROPEAN_SIZES: Lazy<Vec<String>> = Lazy::new(|| {
    (32..=60)
        .step_by(2)
        .map(|n| format!("EU{}", n))
        .chain((50..=60).step_by(2).map(|n| n.to_string()))
        .collect()
});

/// 按词表顺序查找尺码
fn lookup_size(token: &str) -> Option<SizeVocabulary> {
    if token.is_empty() {
        return None;
    }
    if ADULT_ALPHA_SIZES.contains(&token) {
        return Some(SizeVocabulary::AdultAlpha);
    }
    if NUMERIC_SIZES.iter().any(|s| s == token) {
        return Some(SizeVocabulary::Numeric);
    }
    if KIDS_SIZES.contains(&token) {
        return Some(SizeVocabulary::Kids);
    }
    if AGE_BANDED_SIZES.contains(&token) {
        return Some(SizeVocabulary::AgeBanded);
    }
    if EUROPEAN_SIZES.iter().any(|s| s == token) {
        return Some(SizeVocabulary::European);
    }
    None
}

// ==========================================
// SizeColumn - 尺码列
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeColumn {
    pub size: String,
    pub column_index: usize,
    pub original_header: String,
    pub vocabulary: SizeVocabulary,
}

// ==========================================
// ColumnRoles - 按列下标的角色表
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRoles(Vec<ColumnRole>);

impl ColumnRoles {
    pub fn role(&self, index: usize) -> ColumnRole {
        self.0.get(index).copied().unwrap_or(ColumnRole::Unknown)
    }

    /// 首个具有该角色的列
    pub fn first(&self, role: ColumnRole) -> Option<usize> {
        self.0.iter().position(|r| *r == role)
    }

    pub fn has(&self, role: ColumnRole) -> bool {
        self.first(role).is_some()
    }

    pub fn indices(&self, role: ColumnRole) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, r)| **r == role)
            .map(|(i, _)| i)
            .collect()
    }

    /// 已识别（非 Unknown）的角色, 去重并保持列顺序
    pub fn matched(&self) -> Vec<ColumnRole> {
        let mut roles = Vec::new();
        for role in &self.0 {
            if *role != ColumnRole::Unknown && !roles.contains(role) {
                roles.push(*role);
            }
        }
        roles
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, ColumnRole)> + '_ {
        self.0.iter().copied().enumerate()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ==========================================
// ColumnClassifier - 纯函数工具类
// ==========================================
pub struct ColumnClassifier;

impl ColumnClassifier {
    /// 识别单个表头的角色
    pub fn classify_header(header: &str) -> ColumnRole {
        let normalized = normalize_header(header);
        if normalized.is_empty() {
            return ColumnRole::Unknown;
        }

        ROLE_REGEXES
            .iter()
            .find(|(_, regexes)| regexes.iter().any(|re| re.is_match(&normalized)))
            .map(|(role, _)| *role)
            .unwrap_or(ColumnRole::Unknown)
    }

    /// 识别整行表头
    pub fn classify<S: AsRef<str>>(headers: &[S]) -> ColumnRoles {
        ColumnRoles(
            headers
                .iter()
                .map(|h| Self::classify_header(h.as_ref()))
                .collect(),
        )
    }

    /// 识别尺码列（表头本身即尺码, 如 "XS" / "32" / "2-3Y"）
    pub fn find_size_columns<S: AsRef<str>>(headers: &[S]) -> Vec<SizeColumn> {
        headers
            .iter()
            .enumerate()
            .filter_map(|(column_index, header)| {
                let original = header.as_ref();
                let token = normalize_size(original);
                lookup_size(&token).map(|vocabulary| SizeColumn {
                    size: token,
                    column_index,
                    original_header: original.trim().to_string(),
                    vocabulary,
                })
            })
            .collect()
    }

    /// 文本是否为已知尺码
    pub fn is_size_label(text: &str) -> bool {
        lookup_size(&normalize_size(text)).is_some()
    }
}
