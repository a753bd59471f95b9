// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path)
}

/// 解析提取到的图片地址片段
///
/// 绝对地址原样返回；根相对、协议相对和其他相对路径基于站点源补全。
pub fn resolve_resource_url(base_origin: &Url, fragment: &str) -> Result<String, ParseError> {
    match Url::parse(fragment) {
        Ok(_) => Ok(fragment.to_string()),
        Err(ParseError::RelativeUrlWithoutBase) => {
            resolve_url(base_origin, fragment).map(String::from)
        }
        Err(e) => Err(e),
    }
}

/// 构建实体的文件页面地址
///
/// 文件名为 `{实体}.png`，空格、标点和非 ASCII 字符均做百分号编码，`/` 保持原样。
pub fn document_url(base_document_url: &str, entity: &str) -> String {
    let file_name = format!("{}.png", entity);
    let encoded = urlencoding::encode(&file_name).replace("%2F", "/");
    format!("{}{}", base_document_url, encoded)
}
