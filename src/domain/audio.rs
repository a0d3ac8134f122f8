//! WAV 编码
//!
//! 将原始 f32 样本封装为 16-bit PCM 单声道 WAV 容器。
//! 纯内存操作，确定性输出；标准解码器可从结果中按位还原采样率与样本数

use thiserror::Error;

/// 封装错误（仅解析方向，编码不会失败）
#[derive(Debug, Error)]
pub enum WavError {
    #[error("Invalid WAV: {0}")]
    Invalid(&'static str),
}

/// WAV 头信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavInfo {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub data_size: usize,
}

impl WavInfo {
    /// 单声道样本数
    pub fn sample_count(&self) -> usize {
        if self.bits_per_sample == 0 || self.channels == 0 {
            return 0;
        }
        self.data_size / (self.bits_per_sample as usize / 8) / self.channels as usize
    }
}

/// 将 PCM f32 样本编码为单声道 16-bit WAV
///
/// 样本先被夹紧到 [-1.0, 1.0] 再量化
pub fn encode(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    let bits_per_sample: u16 = 16;
    let num_channels: u16 = 1;
    let byte_rate = sample_rate * num_channels as u32 * (bits_per_sample / 8) as u32;
    let block_align = num_channels * (bits_per_sample / 8);

    let pcm_data: Vec<i16> = samples
        .iter()
        .map(|&s| {
            let clamped = s.clamp(-1.0, 1.0);
            (clamped * 32767.0) as i16
        })
        .collect();

    let data_size = pcm_data.len() * 2;
    let file_size = 36 + data_size;

    let mut wav = Vec::with_capacity(44 + data_size);

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(file_size as u32).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes()); // chunk size
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    wav.extend_from_slice(&num_channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&(data_size as u32).to_le_bytes());

    for sample in pcm_data {
        wav.extend_from_slice(&sample.to_le_bytes());
    }

    wav
}

/// 解析 WAV 头
///
/// 用于诊断与测试中的往返校验
pub fn info(data: &[u8]) -> Result<WavInfo, WavError> {
    if data.len() < 44 {
        return Err(WavError::Invalid("data too short"));
    }
    if &data[0..4] != b"RIFF" {
        return Err(WavError::Invalid("missing RIFF header"));
    }
    if &data[8..12] != b"WAVE" {
        return Err(WavError::Invalid("missing WAVE identifier"));
    }

    let mut pos = 12;
    let mut fmt: Option<(u16, u32, u16)> = None;

    while pos + 8 <= data.len() {
        let chunk_id = &data[pos..pos + 4];
        let chunk_size =
            u32::from_le_bytes([data[pos + 4], data[pos + 5], data[pos + 6], data[pos + 7]])
                as usize;

        match chunk_id {
            b"fmt " => {
                if chunk_size < 16 || pos + 8 + 16 > data.len() {
                    return Err(WavError::Invalid("fmt chunk too short"));
                }
                let f = &data[pos + 8..pos + 24];
                fmt = Some((
                    u16::from_le_bytes([f[2], f[3]]),
                    u32::from_le_bytes([f[4], f[5], f[6], f[7]]),
                    u16::from_le_bytes([f[14], f[15]]),
                ));
            }
            b"data" => {
                let (channels, sample_rate, bits_per_sample) =
                    fmt.ok_or(WavError::Invalid("missing fmt chunk"))?;
                return Ok(WavInfo {
                    sample_rate,
                    channels,
                    bits_per_sample,
                    data_size: chunk_size,
                });
            }
            _ => {}
        }

        pos += 8 + chunk_size;
        // 对齐到偶数字节
        if chunk_size % 2 != 0 {
            pos += 1;
        }
    }

    Err(WavError::Invalid("missing data chunk"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_header_fields() {
        let samples = vec![0.0f32; 1000];
        let wav = encode(&samples, 16000);

        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(wav.len(), 44 + 2000);

        let parsed = info(&wav).unwrap();
        assert_eq!(parsed.sample_rate, 16000);
        assert_eq!(parsed.channels, 1);
        assert_eq!(parsed.bits_per_sample, 16);
        assert_eq!(parsed.sample_count(), 1000);
    }

    #[test]
    fn test_encode_round_trip_preserves_sample_count() {
        let samples: Vec<f32> = (0..2400).map(|i| (i as f32 * 0.01).sin()).collect();
        let wav = encode(&samples, 24000);

        let parsed = info(&wav).unwrap();
        assert_eq!(parsed.sample_rate, 24000);
        assert_eq!(parsed.sample_count(), samples.len());
    }

    #[test]
    fn test_encode_clamps_out_of_range_samples() {
        let wav = encode(&[2.0, -2.0], 8000);
        let payload = &wav[44..];
        assert_eq!(i16::from_le_bytes([payload[0], payload[1]]), 32767);
        assert_eq!(i16::from_le_bytes([payload[2], payload[3]]), -32767);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let samples: Vec<f32> = (0..128).map(|i| (i as f32 * 0.1).cos()).collect();
        assert_eq!(encode(&samples, 22050), encode(&samples, 22050));
    }

    #[test]
    fn test_info_rejects_invalid_data() {
        assert!(info(b"too short").is_err());

        let mut not_riff = encode(&[0.0; 10], 8000);
        not_riff[0..4].copy_from_slice(b"JUNK");
        assert!(info(&not_riff).is_err());
    }
}
