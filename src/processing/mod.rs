pub mod pcm_buffer;
pub mod wav_format;
